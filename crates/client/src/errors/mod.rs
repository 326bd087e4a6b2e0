//! Error conversions for the client crate

pub mod conversions;

pub use conversions::{remote_error_message, ClientError};
