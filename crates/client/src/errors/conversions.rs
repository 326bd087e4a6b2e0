//! Conversions from transport errors into domain errors.

use b1sl_domain::ServiceLayerError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the client side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct ClientError(pub ServiceLayerError);

impl From<ClientError> for ServiceLayerError {
    fn from(value: ClientError) -> Self {
        value.0
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ServiceLayerError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for ClientError {
    fn from(value: HttpError) -> Self {
        let error = if value.is_timeout() {
            ServiceLayerError::Transport(format!("http request timed out: {value}"))
        } else if value.is_connect() {
            ServiceLayerError::Transport(format!("http connection failed: {value}"))
        } else if value.is_decode() {
            ServiceLayerError::Internal(format!("failed to decode http response: {value}"))
        } else if value.is_builder() {
            ServiceLayerError::Internal(format!("failed to build http request: {value}"))
        } else {
            ServiceLayerError::Transport(format!("http error: {value}"))
        };
        ClientError(error)
    }
}

/* -------------------------------------------------------------------------- */
/* Remote error bodies */
/* -------------------------------------------------------------------------- */

/// Extract the human-readable message from a Service Layer error body.
///
/// The Service Layer wraps failures as
/// `{"error": {"code": .., "message": {"value": ".."}}}`; some proxies return
/// `message` as a bare string instead. Returns `None` when the body does not
/// follow either shape so the caller can fall back to the raw text.
pub fn remote_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.get("message")?;

    if let Some(text) = message.get("value").and_then(|v| v.as_str()) {
        return Some(text.to_string());
    }
    message.as_str().map(|text| text.to_string())
}
