use std::time::Duration;

use b1sl_domain::ServiceLayerError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::ClientError;

/// Certificate validation policy for the underlying TLS connector.
///
/// The target deployment is an internal appliance with a self-signed
/// certificate, so `AcceptInvalid` is a first-class policy selected through
/// configuration. Verification is never disabled unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateTrust {
    /// Validate server certificates against the system root store.
    #[default]
    SystemRoots,
    /// Accept self-signed / untrusted server certificates.
    AcceptInvalid,
}

/// HTTP client with timeout support and no retry semantics.
///
/// Transient failures are surfaced to the caller unchanged; nothing is
/// retried automatically.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ServiceLayerError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder as a single attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceLayerError> {
        let request = builder.build().map_err(|err| {
            let client_err: ClientError = err.into();
            ServiceLayerError::from(client_err)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let client_err: ClientError = err.into();
                Err(ServiceLayerError::from(client_err))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    certificate_trust: CertificateTrust,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
            certificate_trust: CertificateTrust::SystemRoots,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Select the certificate validation policy.
    pub fn certificate_trust(mut self, trust: CertificateTrust) -> Self {
        self.certificate_trust = trust;
        self
    }

    pub fn build(self) -> Result<HttpClient, ServiceLayerError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.certificate_trust == CertificateTrust::AcceptInvalid {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| {
            let client_err: ClientError = err.into();
            ServiceLayerError::from(client_err)
        })?;

        Ok(HttpClient { client })
    }
}
