//! Login session snapshot

use serde::{Deserialize, Serialize};

/// Snapshot of a server session created by a successful login.
///
/// Held by the session client for its lifetime; invalidated by logout or by
/// the server independently. There is no client-side expiry tracking —
/// `session_timeout` is informational only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Opaque server-issued session identifier (the `B1SESSION` cookie value).
    pub session_id: String,
    /// Cluster-routing affinity cookie value, present only when the server
    /// runs in clustered mode.
    pub route_id: Option<String>,
    /// Service Layer version reported by the login response.
    pub version: Option<String>,
    /// Server-side session timeout in minutes, as reported at login.
    pub session_timeout: Option<u32>,
}
