//! Entity operation behavior: paging, projections, payload shaping and
//! partial updates against a mock server.

mod support;

use b1sl_domain::ServiceLayerError;
use serde_json::json;
use wiremock::matchers::{
    body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::logged_in_client;

#[tokio::test]
async fn list_items_follows_the_continuation_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items"))
        .and(query_param("$select", "ItemCode,ItemName"))
        .and(query_param_is_missing("$skiptoken"))
        .and(header("Prefer", "odata.maxpagesize=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"ItemCode": "A00001", "ItemName": "Printer"},
                {"ItemCode": "A00002", "ItemName": "Scanner"}
            ],
            "odata.nextLink": "Items?$select=ItemCode,ItemName&$skiptoken=2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Items"))
        .and(query_param("$skiptoken", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ItemCode": "A00003", "ItemName": "Monitor"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let items = client.list_items(2).await.expect("items");

    assert_eq!(items.len(), 3);
    assert_eq!(items[2].item_code, "A00003");
}

#[tokio::test]
async fn absolute_continuation_links_are_followed_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items"))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ItemCode": "A00001"}],
            "@odata.nextLink":
                format!("{}/Items?$select=ItemCode,ItemName&$skiptoken=9", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Items"))
        .and(query_param("$skiptoken", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ItemCode": "A00002"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let items = client.list_items(1).await.expect("items");

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].item_code, "A00002");
}

#[tokio::test]
async fn bill_of_exchange_numbers_keep_payments_without_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/IncomingPayments"))
        .and(query_param("$select", "DocEntry,BillOfExchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"DocEntry": 1, "BillOfExchange": {"BillOfExchangeNo": 42}},
                {"DocEntry": 2, "BillOfExchange": null},
                {"DocEntry": 3, "BillOfExchange": {"BillOfExchangeNo": 7}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let numbers = client.list_bill_of_exchange_numbers().await.expect("numbers");

    assert_eq!(numbers, vec![Some(42), None, Some(7)]);
}

#[tokio::test]
async fn absent_item_is_none_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items('NOPE')"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": -2028, "message": {"value": "No matching records found"}}
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let item = client.get_item("NOPE").await.expect("lookup");

    assert!(item.is_none());
}

#[tokio::test]
async fn business_partner_is_fetched_by_card_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/BusinessPartners('C20000')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "CardCode": "C20000",
            "CardName": "Norm Thompson",
            "CardType": "cCustomer"
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let partner = client.get_business_partner("C20000").await.expect("lookup").expect("present");

    assert_eq!(partner.card_name.as_deref(), Some("Norm Thompson"));
}

#[tokio::test]
async fn orders_are_filtered_server_side() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Orders"))
        .and(query_param("$filter", "DocTotal gt 1000"))
        .and(query_param("$select", "DocEntry,CardCode,DocTotal,Address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"DocEntry": 7, "CardCode": "C20000", "DocTotal": 1500.5, "Address": "Main St 1"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let orders = client.list_orders_above(1000.0).await.expect("orders");

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].doc_entry, 7);
    assert_eq!(orders[0].doc_total, 1500.5);
}

#[tokio::test]
async fn sales_order_payload_is_shaped_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "DocEntry": 42,
            "DocNum": 1042,
            "CardCode": "C20000",
            "DocumentLines": [{"LineNum": 0, "ItemCode": "A00001", "Quantity": 100.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let created = client.create_sales_order("C20000", "A00001", 100.0).await.expect("order");
    assert_eq!(created.doc_num, Some(1042));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&requests.last().unwrap().body).unwrap();

    // Null fields never reach the wire; nested lines also lose integer zeros.
    assert_eq!(body["CardCode"], "C20000");
    assert_eq!(body["DocObjectCode"], "oOrders");
    assert_eq!(body["DocType"], "dDocument_Items");
    assert_eq!(body["RelatedType"], -1);
    assert!(body.as_object().unwrap().values().all(|value| !value.is_null()));

    let line = body["DocumentLines"][0].as_object().unwrap();
    assert_eq!(line.len(), 2);
    assert_eq!(line["ItemCode"], "A00001");
    assert_eq!(line["Quantity"], 100.0);
}

#[tokio::test]
async fn create_item_starts_numbering_at_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items"))
        .and(query_param("$filter", "startswith(ItemCode, 'TEST')"))
        .and(header("Prefer", "odata.maxpagesize=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Items"))
        .and(body_partial_json(json!({"ItemCode": "TEST00001", "ItemType": "itItems"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ItemCode": "TEST00001",
            "ItemName": "Item TEST00001",
            "ItemType": "itItems"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let item = client.create_item("TEST").await.expect("item");

    assert_eq!(item.item_code, "TEST00001");
}

#[tokio::test]
async fn create_item_increments_the_highest_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items"))
        .and(query_param("$filter", "startswith(ItemCode, 'TEST')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ItemCode": "TEST00001"}, {"ItemCode": "TEST00003"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Items"))
        .and(body_partial_json(json!({"ItemCode": "TEST00004"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"ItemCode": "TEST00004"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let item = client.create_item("TEST").await.expect("item");

    assert_eq!(item.item_code, "TEST00004");
}

#[tokio::test]
async fn update_item_patches_only_the_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items('A00001')"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ItemCode": "A00001",
            "ItemName": "Printer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/Items('A00001')"))
        .and(body_json(json!({"ItemName": "Printer UPD. checked"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let item = client.update_item("A00001", "checked").await.expect("update");

    assert_eq!(item.item_name.as_deref(), Some("Printer UPD. checked"));
}

#[tokio::test]
async fn updating_a_missing_item_is_a_not_found_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Items('NOPE')"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": -2028, "message": {"value": "No matching records found"}}
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let error = client.update_item("NOPE", "checked").await.expect_err("missing");

    assert!(matches!(error, ServiceLayerError::NotFound(_)));
}

#[tokio::test]
async fn server_fault_maps_to_validation_error_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": -5002, "message": {"value": "Invalid BP code"}}
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let error = client.create_sales_order("BAD", "A00001", 1.0).await.expect_err("fault");

    match error {
        ServiceLayerError::Validation(message) => assert!(message.contains("Invalid BP code")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn operations_require_an_open_session() {
    let server = MockServer::start().await;

    let client = support::test_client(&server);
    let error = client.list_items(10).await.expect_err("no session");

    assert!(matches!(error, ServiceLayerError::NotAuthenticated(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
