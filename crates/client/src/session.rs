//! Session middleware: pure request decoration and response observation.
//!
//! The session cookie state never mutates behind the transport's back:
//! [`request_headers`] turns the current state into outbound headers, and
//! [`observe_set_cookie`] folds a response's `Set-Cookie` header into the
//! next state. Both are pure functions composed around the HTTP call.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};

/// Name of the server-issued session identifier cookie.
pub const SESSION_COOKIE: &str = "B1SESSION";
/// Name of the cluster-routing affinity cookie.
pub const ROUTE_COOKIE: &str = "ROUTEID";

const ACCEPT_VALUE: &str = "application/json;odata=minimalmetadata";
const CONTENT_TYPE_VALUE: &str = "application/json;odata=minimalmetadata;charset=utf8";

/// Cookie state of one logical server session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// `B1SESSION` cookie value; `Some` while authenticated.
    pub session_id: Option<String>,
    /// `ROUTEID` cookie value; set only by clustered servers.
    pub route_id: Option<String>,
}

impl SessionState {
    /// Whether a login has completed and not been discarded.
    pub fn authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    /// State with no session at all.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Render the `Cookie` header value for this state, if any.
    ///
    /// Format on the wire: `B1SESSION=<guid>[; ROUTEID=<route>]`.
    pub fn cookie_header(&self) -> Option<String> {
        let session_id = self.session_id.as_deref()?;
        let mut cookie = format!("{SESSION_COOKIE}={session_id}");
        if let Some(route_id) = self.route_id.as_deref() {
            cookie.push_str(&format!("; {ROUTE_COOKIE}={route_id}"));
        }
        Some(cookie)
    }
}

/// What to do with a stored route id when a response carries no
/// `ROUTEID` segment.
///
/// The upstream behavior is ambiguous, so it is a policy rather than a
/// hard-coded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteIdPolicy {
    /// Keep the previously recorded route id until a new one arrives.
    #[default]
    Retain,
    /// Drop the recorded route id whenever a response lacks one.
    ClearWhenAbsent,
}

/// Build the outbound headers for the given session state.
///
/// Every request carries minimal-metadata JSON content negotiation, the
/// `Prefer: odata.maxpagesize` hint (0 is passed through literally, meaning
/// "no explicit limit"), and the session cookie pair when authenticated.
/// Keep-alive and redirect following are connector defaults; `Expect:
/// 100-continue` is never sent.
pub fn request_headers(state: &SessionState, page_size: u32) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_VALUE));

    if let Ok(value) = HeaderValue::from_str(&format!("odata.maxpagesize={page_size}")) {
        headers.insert("Prefer", value);
    }

    if let Some(cookie) = state.cookie_header() {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.insert(COOKIE, value);
        }
    }

    headers
}

/// Fold a response's `Set-Cookie` content into the next session state.
///
/// Clustered servers return `ROUTEID=.nodeN` alongside the session cookie;
/// the value up to the next `;` is recorded for inclusion in subsequent
/// request cookies. Absence is handled per [`RouteIdPolicy`].
pub fn observe_set_cookie(
    state: &SessionState,
    set_cookie: Option<&str>,
    policy: RouteIdPolicy,
) -> SessionState {
    let mut next = state.clone();
    match set_cookie.and_then(extract_route_id) {
        Some(route_id) => next.route_id = Some(route_id),
        None => {
            if policy == RouteIdPolicy::ClearWhenAbsent {
                next.route_id = None;
            }
        }
    }
    next
}

/// Pull the `ROUTEID` value out of a raw `Set-Cookie` header.
///
/// Example input:
/// `B1SESSION=146eae44-...;HttpOnly;,ROUTEID=.node2; path=/b1s`
fn extract_route_id(header: &str) -> Option<String> {
    let start = header.find(&format!("{ROUTE_COOKIE}="))?;
    let segment = &header[start + ROUTE_COOKIE.len() + 1..];
    let end = segment.find(';').unwrap_or(segment.len());
    let value = segment[..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}
