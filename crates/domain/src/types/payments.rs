//! Incoming payment types

use serde::{Deserialize, Serialize};

/// Incoming payment as exchanged with the `IncomingPayments` entity set.
///
/// Only the projection the client reads is modeled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct IncomingPayment {
    pub doc_entry: Option<i64>,
    pub bill_of_exchange: Option<BillOfExchange>,
}

/// Bill-of-exchange block nested in a payment document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct BillOfExchange {
    pub bill_of_exchange_no: Option<i32>,
}
