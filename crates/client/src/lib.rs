//! # B1SL Client
//!
//! Session-affinity-aware client for the SAP Business One Service Layer.
//!
//! This crate contains:
//! - The HTTP transport (`http`) with a pluggable certificate-trust policy
//! - Pure session middleware (`session`): request decoration and
//!   `Set-Cookie` observation
//! - Outbound payload shaping (`shaping`): null / zero / empty filtering
//! - The OData `$batch` codec (`batch`)
//! - The session client itself (`client`) and its entity operations
//!   (`operations`)
//!
//! ## Architecture
//! - Depends on `b1sl-domain` for entity types and errors
//! - Contains all "impure" code (network I/O)
//! - One logical session per [`ServiceLayerClient`]; calls are serialized
//!   internally, never retried

pub mod batch;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod operations;
pub mod session;
pub mod shaping;

// Re-export commonly used items
pub use client::ServiceLayerClient;
pub use config::ServiceLayerConfig;
pub use http::{CertificateTrust, HttpClient};
pub use session::RouteIdPolicy;
pub use shaping::ShapingPolicy;
