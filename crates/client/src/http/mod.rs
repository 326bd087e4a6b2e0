//! HTTP transport layer

pub mod client;

pub use client::{CertificateTrust, HttpClient, HttpClientBuilder};
