//! # B1SL Domain
//!
//! Domain types and models for the Service Layer client.
//!
//! This crate contains:
//! - Wire-shaped entity types (`Item`, `BusinessPartner`, `Document`, ...)
//! - The session snapshot returned by a successful login
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
