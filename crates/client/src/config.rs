//! Client configuration.
//!
//! Defaults target the demo deployment; every field can be overridden
//! through `B1SL_*` environment variables (typically loaded from a `.env`
//! file by the binary before calling [`ServiceLayerConfig::from_env`]).

use std::time::Duration;

use b1sl_domain::{Result, ServiceLayerError};

use crate::http::CertificateTrust;
use crate::session::RouteIdPolicy;

/// Connection and behavior settings for one [`crate::ServiceLayerClient`].
#[derive(Debug, Clone)]
pub struct ServiceLayerConfig {
    /// Service root, e.g. `https://hanab1s03:50000/b1s/v1/`.
    pub base_url: String,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Company database to open the session against.
    pub company_db: String,
    /// Value of the `Prefer: odata.maxpagesize` hint; 0 is sent literally.
    pub page_size: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// TLS certificate validation policy.
    pub certificate_trust: CertificateTrust,
    /// What to do with a stored route id when responses omit `ROUTEID`.
    pub route_id_policy: RouteIdPolicy,
    /// Entity sets whose outbound payloads bypass shaping.
    pub passthrough_types: Vec<String>,
}

impl Default for ServiceLayerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hanab1s03:50000/b1s/v1/".to_string(),
            username: "manager".to_string(),
            password: String::new(),
            company_db: "SBODEMOES".to_string(),
            page_size: 10,
            timeout: Duration::from_secs(30),
            // The target appliance presents a self-signed certificate.
            certificate_trust: CertificateTrust::AcceptInvalid,
            route_id_policy: RouteIdPolicy::default(),
            passthrough_types: vec!["BusinessPartners".to_string()],
        }
    }
}

impl ServiceLayerConfig {
    /// Load configuration from `B1SL_*` environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Factored out of [`Self::from_env`] so tests do not race on process
    /// environment state.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("B1SL_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(username) = lookup("B1SL_USERNAME") {
            config.username = username;
        }
        if let Some(password) = lookup("B1SL_PASSWORD") {
            config.password = password;
        }
        if let Some(company_db) = lookup("B1SL_COMPANY_DB") {
            config.company_db = company_db;
        }

        if let Some(raw) = lookup("B1SL_PAGE_SIZE") {
            config.page_size = raw.trim().parse().map_err(|_| {
                ServiceLayerError::Config(format!("B1SL_PAGE_SIZE is not a number: {raw:?}"))
            })?;
        }

        if let Some(raw) = lookup("B1SL_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ServiceLayerError::Config(format!("B1SL_TIMEOUT_SECS is not a number: {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("B1SL_VERIFY_TLS") {
            config.certificate_trust = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => CertificateTrust::SystemRoots,
                "false" | "0" | "no" => CertificateTrust::AcceptInvalid,
                _ => {
                    return Err(ServiceLayerError::Config(format!(
                        "B1SL_VERIFY_TLS is not a boolean: {raw:?}"
                    )))
                }
            };
        }

        Ok(config)
    }
}
