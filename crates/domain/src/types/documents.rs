//! Marketing document (order) types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marketing document as exchanged with the `Orders` entity set.
///
/// Only the fields the harness touches are modeled; everything else the
/// server returns is ignored on decode. Optional fields serialize as `null`
/// so that outbound payload shaping owns the wire representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Document {
    pub doc_entry: Option<i64>,
    pub doc_num: Option<i64>,
    pub card_code: Option<String>,
    pub doc_date: Option<NaiveDate>,
    pub doc_due_date: Option<NaiveDate>,
    /// Document object code (`oOrders` for sales orders).
    pub doc_object_code: Option<String>,
    /// `dDocument_Items` or `dDocument_Service`.
    pub doc_type: Option<String>,
    pub down_payment_type: Option<String>,
    pub interim_type: Option<String>,
    pub related_type: Option<i32>,
    pub doc_total: Option<f64>,
    pub document_lines: Vec<DocumentLine>,
}

/// Single line of a marketing document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DocumentLine {
    pub line_num: Option<i32>,
    pub item_code: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
}

/// Projection returned by order listings
/// (`$select=DocEntry,CardCode,DocTotal,Address`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct OrderSummary {
    pub doc_entry: i64,
    pub card_code: Option<String>,
    pub doc_total: f64,
    pub address: Option<String>,
}
