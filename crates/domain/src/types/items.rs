//! Item master data types

use serde::{Deserialize, Serialize};

/// Item master data as exchanged with the `Items` entity set.
///
/// Optional fields serialize as `null` on purpose: outbound payload shaping
/// decides what is actually sent over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Item {
    pub item_code: String,
    pub item_name: Option<String>,
    /// Item category (`itItems`, `itLabor`, `itTravel`).
    pub item_type: Option<String>,
    /// `tYES` / `tNO` flag as the wire represents it.
    pub frozen: Option<String>,
}

/// Projection returned by item listings (`$select=ItemCode,ItemName`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ItemSummary {
    pub item_code: String,
    pub item_name: Option<String>,
}
