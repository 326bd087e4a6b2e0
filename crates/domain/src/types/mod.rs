//! Domain types and models
//!
//! All entity types mirror the remote OData schema: PascalCase wire names,
//! request-scoped values only, no local persistence.

pub mod documents;
pub mod items;
pub mod partners;
pub mod payments;
pub mod session;

// Re-export entity types for convenience
pub use documents::{Document, DocumentLine, OrderSummary};
pub use items::{Item, ItemSummary};
pub use partners::BusinessPartner;
pub use payments::{BillOfExchange, IncomingPayment};
pub use session::Session;
