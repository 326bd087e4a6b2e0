//! Typed entity operations issued through [`ServiceLayerClient`].
//!
//! Every call here rides the open session: eager auth check, decorated
//! headers, cookie feedback. "Not found" on a single-entity fetch is a
//! value (`Ok(None)`), not an error; actual faults map onto
//! [`ServiceLayerError`] variants by status class.

use b1sl_domain::{
    BusinessPartner, Document, DocumentLine, IncomingPayment, Item, ItemSummary, OrderSummary,
    Result, ServiceLayerError,
};
use chrono::Local;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::batch::{build_get_batch, new_boundary, parse_batch_response};
use crate::client::{ApiResponse, ServiceLayerClient};
use crate::errors::remote_error_message;

/// One page of an OData collection response.
///
/// Older servers spell the continuation link `odata.nextLink`, newer ones
/// `@odata.nextLink`; both are accepted.
#[derive(Debug, Deserialize)]
struct ODataPage<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "odata.nextLink", alias = "@odata.nextLink", default)]
    next_link: Option<String>,
}

impl ServiceLayerClient {
    /// List all items as `(code, name)` projections, following server-driven
    /// paging until the collection is exhausted.
    pub async fn list_items(&self, page_size: u32) -> Result<Vec<ItemSummary>> {
        self.fetch_pages("Items?$select=ItemCode,ItemName".to_string(), Some(page_size)).await
    }

    /// Fetch a single item by key. Returns `Ok(None)` when the server has no
    /// item with that code.
    pub async fn get_item(&self, code: &str) -> Result<Option<Item>> {
        self.fetch_entity(&format!("Items('{}')", odata_key(code))).await
    }

    /// Fetch a single business partner by card code. Returns `Ok(None)` when
    /// absent.
    pub async fn get_business_partner(&self, code: &str) -> Result<Option<BusinessPartner>> {
        self.fetch_entity(&format!("BusinessPartners('{}')", odata_key(code))).await
    }

    /// List orders whose document total exceeds `threshold`, as the fixed
    /// `DocEntry,CardCode,DocTotal,Address` projection.
    pub async fn list_orders_above(&self, threshold: f64) -> Result<Vec<OrderSummary>> {
        let filter = urlencoding::encode(&format!("DocTotal gt {threshold}")).into_owned();
        let path = format!("Orders?$filter={filter}&$select=DocEntry,CardCode,DocTotal,Address");
        self.fetch_pages(path, None).await
    }

    /// Create a one-line sales order for `card_code` and return the created
    /// document as the server stored it.
    pub async fn create_sales_order(
        &self,
        card_code: &str,
        item_code: &str,
        quantity: f64,
    ) -> Result<Document> {
        let today = Local::now().date_naive();
        let order = Document {
            card_code: Some(card_code.to_string()),
            doc_date: Some(today),
            doc_due_date: Some(today),
            doc_object_code: Some("oOrders".to_string()),
            doc_type: Some("dDocument_Items".to_string()),
            down_payment_type: Some("tYES".to_string()),
            interim_type: Some("0".to_string()),
            related_type: Some(-1),
            document_lines: vec![DocumentLine {
                item_code: Some(item_code.to_string()),
                quantity: Some(quantity),
                ..DocumentLine::default()
            }],
            ..Document::default()
        };

        self.create_entity("Orders", &order).await
    }

    /// Create a new item whose code is `prefix` plus the next free numeric
    /// suffix (`TEST` → `TEST00001`, `TEST00002`, ...). The name embeds the
    /// code and the creation timestamp.
    pub async fn create_item(&self, prefix: &str) -> Result<Item> {
        let code = self.next_item_code(prefix).await?;
        let name =
            format!("Item {code} created {}", Local::now().format("%d/%m/%y %H:%M:%S"));

        let item = Item {
            item_code: code,
            item_name: Some(name),
            item_type: Some("itItems".to_string()),
            frozen: None,
        };

        self.create_entity("Items", &item).await
    }

    /// Append `text` to an item's name through a partial update.
    ///
    /// The item is fetched first; a missing item is an error here (unlike
    /// [`Self::get_item`], the caller asked to change something specific).
    pub async fn update_item(&self, code: &str, text: &str) -> Result<Item> {
        let mut item = self.get_item(code).await?.ok_or_else(|| {
            ServiceLayerError::NotFound(format!("item {code} does not exist"))
        })?;

        let updated_name = match item.item_name.take() {
            Some(name) => format!("{name} UPD. {text}"),
            None => format!("UPD. {text}"),
        };

        let path = format!("Items('{}')", odata_key(code));
        let patch = serde_json::json!({ "ItemName": updated_name });
        let response = self.execute_json(Method::PATCH, &path, None, Some(patch)).await?;

        if !response.status.is_success() {
            return Err(status_error(&response));
        }

        // PATCH typically answers 204 No Content; reconstruct the entity
        // locally in that case.
        if response.body.trim().is_empty() {
            item.item_name = Some(updated_name);
            return Ok(item);
        }
        parse_json(&response.body)
    }

    /// Fetch several items in one `$batch` round trip.
    ///
    /// Any sub-response outside 200–299 aborts the whole call with the
    /// embedded server message.
    pub async fn batch_fetch(&self, codes: &[&str]) -> Result<Vec<Item>> {
        let boundary = new_boundary();
        let paths: Vec<String> =
            codes.iter().map(|code| format!("Items('{}')", odata_key(code))).collect();
        let body = build_get_batch(&boundary, &paths);
        let content_type = format!("multipart/mixed;boundary={boundary}");

        let response =
            self.execute_raw(Method::POST, "$batch", body, &content_type).await?;
        if !response.status.is_success() {
            return Err(status_error(&response));
        }

        let parts = parse_batch_response(response.content_type.as_deref(), &response.body)?;
        let mut items = Vec::with_capacity(parts.len());
        for part in parts {
            if !(200..300).contains(&part.status) {
                let message =
                    remote_error_message(&part.body).unwrap_or_else(|| part.body.clone());
                return Err(ServiceLayerError::Batch(format!(
                    "batch sub-request failed ({}): {message}",
                    part.status
                )));
            }
            items.push(parse_json(&part.body)?);
        }
        Ok(items)
    }

    /// List the bill-of-exchange number of every incoming payment.
    ///
    /// Payments without a bill of exchange are kept as `None` so the result
    /// lines up with the payment sequence.
    pub async fn list_bill_of_exchange_numbers(&self) -> Result<Vec<Option<i32>>> {
        let payments: Vec<IncomingPayment> = self
            .fetch_pages("IncomingPayments?$select=DocEntry,BillOfExchange".to_string(), None)
            .await?;

        Ok(payments
            .into_iter()
            .map(|payment| payment.bill_of_exchange.and_then(|b| b.bill_of_exchange_no))
            .collect())
    }

    /// Fetch company administration info through the `CompanyService` action.
    pub async fn get_company_info(&self) -> Result<Value> {
        let response = self
            .execute_json(Method::POST, "CompanyService_GetCompanyInfo", None, None)
            .await?;
        if !response.status.is_success() {
            return Err(status_error(&response));
        }
        parse_json(&response.body)
    }

    /* ---------------------------------------------------------------------- */
    /* Helpers */
    /* ---------------------------------------------------------------------- */

    /// GET a single entity, treating 404 as absence.
    async fn fetch_entity<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.execute_json(Method::GET, path, None, None).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status.is_success() {
            return Err(status_error(&response));
        }
        parse_json(&response.body).map(Some)
    }

    /// Follow `odata.nextLink` continuations starting at `first_path`.
    async fn fetch_pages<T: DeserializeOwned>(
        &self,
        first_path: String,
        page_size: Option<u32>,
    ) -> Result<Vec<T>> {
        let mut collected = Vec::new();
        let mut next = Some(first_path);

        while let Some(path) = next {
            let response = self.execute_json(Method::GET, &path, page_size, None).await?;
            if !response.status.is_success() {
                return Err(status_error(&response));
            }

            let page: ODataPage<T> = parse_json(&response.body)?;
            debug!(%path, returned = page.value.len(), "collection page received");
            collected.extend(page.value);
            next = page.next_link;
        }

        Ok(collected)
    }

    /// POST a shaped entity payload and decode the stored representation.
    async fn create_entity<T>(&self, entity_set: &str, entity: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let payload = serde_json::to_value(entity)
            .map_err(|err| ServiceLayerError::Internal(format!("encoding entity: {err}")))?;
        let shaped = self.shaping().apply(entity_set, payload);

        let response =
            self.execute_json(Method::POST, entity_set, None, Some(shaped)).await?;
        if !response.status.is_success() {
            return Err(status_error(&response));
        }
        parse_json(&response.body)
    }

    /// Determine the next free `{prefix}{NNNNN}` item code.
    ///
    /// Queries every existing code with the prefix (`odata.maxpagesize=0`
    /// so the server returns them all), takes the highest numeric suffix and
    /// adds one; 1 when none exist.
    async fn next_item_code(&self, prefix: &str) -> Result<String> {
        let filter =
            urlencoding::encode(&format!("startswith(ItemCode, '{}')", odata_key(prefix)))
                .into_owned();
        let path = format!("Items?$filter={filter}&$select=ItemCode");

        let existing: Vec<ItemSummary> = self.fetch_pages(path, Some(0)).await?;
        let next = existing
            .iter()
            .filter_map(|summary| summary.item_code.strip_prefix(prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .map_or(1, |highest| highest + 1);

        Ok(format!("{prefix}{next:05}"))
    }
}

/// Map a non-success response onto the error taxonomy, carrying the server's
/// message when the body has one.
fn status_error(response: &ApiResponse) -> ServiceLayerError {
    let status = response.status;
    let message = remote_error_message(&response.body)
        .unwrap_or_else(|| response.body.clone());
    let detail = format!("{status}: {message}");

    match status.as_u16() {
        401 | 403 => ServiceLayerError::Auth(detail),
        404 => ServiceLayerError::NotFound(detail),
        400..=499 => ServiceLayerError::Validation(detail),
        500..=599 => ServiceLayerError::Transport(detail),
        _ => ServiceLayerError::Internal(detail),
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| ServiceLayerError::Internal(format!("decoding response body: {err}")))
}

/// Escape a value for use inside an OData single-quoted key literal.
fn odata_key(value: &str) -> String {
    value.replace('\'', "''")
}
