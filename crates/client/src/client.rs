//! The Service Layer session client.
//!
//! One [`ServiceLayerClient`] owns one logical server session. Session state
//! lives behind a [`tokio::sync::Mutex`], which also serializes calls: the
//! Service Layer rejects concurrent requests on one session, so at most one
//! request is in flight per client at any time.

use b1sl_domain::{Result, ServiceLayerError, Session};
use reqwest::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ServiceLayerConfig;
use crate::errors::{remote_error_message, ClientError};
use crate::http::HttpClient;
use crate::session::{observe_set_cookie, request_headers, SessionState};
use crate::shaping::ShapingPolicy;

/// Outcome of one Service Layer call, with the body already read.
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// Client for one SAP Business One Service Layer session.
pub struct ServiceLayerClient {
    config: ServiceLayerConfig,
    http: HttpClient,
    shaping: ShapingPolicy,
    state: Mutex<SessionState>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginResponse {
    session_id: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    session_timeout: Option<u32>,
}

impl ServiceLayerClient {
    /// Build a client from configuration. No request is made yet.
    pub fn new(mut config: ServiceLayerConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|err| {
            ServiceLayerError::Config(format!("invalid base url {:?}: {err}", config.base_url))
        })?;
        if !config.base_url.ends_with('/') {
            config.base_url.push('/');
        }

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(format!("b1sl-client/{}", env!("CARGO_PKG_VERSION")))
            .certificate_trust(config.certificate_trust)
            .build()?;

        let shaping = ShapingPolicy::new(config.passthrough_types.iter().cloned());

        Ok(Self { config, http, shaping, state: Mutex::new(SessionState::cleared()) })
    }

    /// Whether a login has completed and not been discarded.
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.authenticated()
    }

    pub(crate) fn page_size(&self) -> u32 {
        self.config.page_size
    }

    pub(crate) fn shaping(&self) -> &ShapingPolicy {
        &self.shaping
    }

    fn endpoint(&self, path: &str) -> String {
        // Newer servers return absolute continuation links; use them as-is.
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{path}", self.config.base_url)
    }

    /// Open a session. Any previously held session is discarded first.
    pub async fn login(&self, username: &str, password: &str, company_db: &str) -> Result<Session> {
        let mut state = self.state.lock().await;
        *state = SessionState::cleared();

        let credentials = serde_json::json!({
            "UserName": username,
            "Password": password,
            "CompanyDB": company_db,
        });
        let body = serde_json::to_vec(&credentials)
            .map_err(|err| ServiceLayerError::Internal(format!("encoding login body: {err}")))?;

        let builder = self
            .http
            .request(Method::POST, self.endpoint("Login"))
            .headers(request_headers(&state, self.config.page_size))
            .body(body);

        let response = self.http.send(builder).await?;
        let status = response.status();
        let set_cookie = collect_set_cookie(&response);
        let text = read_body(response).await?;

        if !status.is_success() {
            let message = remote_error_message(&text).unwrap_or(text);
            return Err(ServiceLayerError::Auth(format!("login failed ({status}): {message}")));
        }

        let login: LoginResponse = serde_json::from_str(&text).map_err(|err| {
            ServiceLayerError::Internal(format!("unexpected login response: {err}"))
        })?;

        state.session_id = Some(login.session_id.clone());
        *state = observe_set_cookie(&state, set_cookie.as_deref(), self.config.route_id_policy);

        info!(company_db, "Service Layer session opened");
        Ok(Session {
            session_id: login.session_id,
            route_id: state.route_id.clone(),
            version: login.version,
            session_timeout: login.session_timeout,
        })
    }

    /// Close the current session.
    ///
    /// The locally held session is discarded no matter what the server
    /// answers; only a transport failure is reported back.
    pub async fn logout(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.authenticated() {
            debug!("logout requested without an open session");
            return Ok(());
        }

        let builder = self
            .http
            .request(Method::POST, self.endpoint("Logout"))
            .headers(request_headers(&state, self.config.page_size));

        let sent = self.http.send(builder).await;
        *state = SessionState::cleared();

        match sent {
            Ok(response) if response.status().is_success() => {
                info!("Service Layer session closed");
                Ok(())
            }
            Ok(response) => {
                warn!(status = %response.status(), "logout rejected by server; session discarded locally");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Execute one JSON request on the open session.
    ///
    /// `page_size` overrides the configured `odata.maxpagesize` hint for
    /// this call only. Fails eagerly with [`ServiceLayerError::NotAuthenticated`]
    /// when no session is open, without touching the network.
    pub(crate) async fn execute_json(
        &self,
        method: Method,
        path: &str,
        page_size: Option<u32>,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let mut state = self.state.lock().await;
        if !state.authenticated() {
            return Err(not_authenticated(path));
        }

        let mut builder = self
            .http
            .request(method, self.endpoint(path))
            .headers(request_headers(&state, page_size.unwrap_or(self.config.page_size)));

        if let Some(payload) = body {
            let encoded = serde_json::to_vec(&payload).map_err(|err| {
                ServiceLayerError::Internal(format!("encoding request body: {err}"))
            })?;
            builder = builder.body(encoded);
        }

        let response = self.http.send(builder).await?;
        *state = observe_set_cookie(
            &state,
            collect_set_cookie(&response).as_deref(),
            self.config.route_id_policy,
        );

        into_api_response(response).await
    }

    /// Execute one request with a caller-provided body and content type.
    ///
    /// Used for `$batch`, whose body is `multipart/mixed` rather than JSON.
    pub(crate) async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        body: String,
        content_type: &str,
    ) -> Result<ApiResponse> {
        let mut state = self.state.lock().await;
        if !state.authenticated() {
            return Err(not_authenticated(path));
        }

        let mut headers = request_headers(&state, self.config.page_size);
        let value = HeaderValue::from_str(content_type).map_err(|err| {
            ServiceLayerError::Internal(format!("invalid content type {content_type:?}: {err}"))
        })?;
        headers.insert(CONTENT_TYPE, value);

        let builder =
            self.http.request(method, self.endpoint(path)).headers(headers).body(body);

        let response = self.http.send(builder).await?;
        *state = observe_set_cookie(
            &state,
            collect_set_cookie(&response).as_deref(),
            self.config.route_id_policy,
        );

        into_api_response(response).await
    }
}

fn not_authenticated(path: &str) -> ServiceLayerError {
    ServiceLayerError::NotAuthenticated(format!("no open session for request to {path}"))
}

/// Join all `Set-Cookie` values into the single comma-separated string the
/// route-id extractor works on.
fn collect_set_cookie(response: &Response) -> Option<String> {
    let values: Vec<&str> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    (!values.is_empty()).then(|| values.join(","))
}

async fn into_api_response(response: Response) -> Result<ApiResponse> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let body = read_body(response).await?;
    Ok(ApiResponse { status, content_type, body })
}

async fn read_body(response: Response) -> Result<String> {
    response.text().await.map_err(|err| {
        let client_err: ClientError = err.into();
        ServiceLayerError::from(client_err)
    })
}
