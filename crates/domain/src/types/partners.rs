//! Business partner master data types

use serde::{Deserialize, Serialize};

/// Business partner master data as exchanged with the `BusinessPartners`
/// entity set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct BusinessPartner {
    pub card_code: String,
    pub card_name: Option<String>,
    /// `cCustomer` / `cSupplier` / `cLid` as the wire represents it.
    pub card_type: Option<String>,
    /// `tYES` / `tNO` flag.
    pub frozen: Option<String>,
}
