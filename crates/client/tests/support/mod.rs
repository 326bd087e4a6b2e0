//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use b1sl_client::{CertificateTrust, ServiceLayerClient, ServiceLayerConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SESSION_ID: &str = "146eae44-fc3a-11e3-8000-047d7ba5aff2";
pub const USERNAME: &str = "manager";
pub const PASSWORD: &str = "secret";
pub const COMPANY_DB: &str = "SBODEMOES";

/// Configuration pointed at the mock server.
pub fn test_config(server: &MockServer) -> ServiceLayerConfig {
    ServiceLayerConfig {
        base_url: format!("{}/", server.uri()),
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
        company_db: COMPANY_DB.to_string(),
        timeout: Duration::from_secs(5),
        certificate_trust: CertificateTrust::SystemRoots,
        ..ServiceLayerConfig::default()
    }
}

pub fn test_client(server: &MockServer) -> ServiceLayerClient {
    ServiceLayerClient::new(test_config(server)).expect("client")
}

/// A successful `Login` response carrying the session cookie, and a
/// `ROUTEID` cookie when `route_id` is given.
pub fn login_response(route_id: Option<&str>) -> ResponseTemplate {
    let mut template = ResponseTemplate::new(200)
        .insert_header("Set-Cookie", format!("B1SESSION={SESSION_ID};HttpOnly;").as_str())
        .set_body_json(json!({
            "odata.metadata": "https://host:50000/b1s/v1/$metadata#B1Sessions/@Element",
            "SessionId": SESSION_ID,
            "Version": "910",
            "SessionTimeout": 30
        }));
    if let Some(route) = route_id {
        template = template.append_header("Set-Cookie", format!("ROUTEID={route}; path=/b1s").as_str());
    }
    template
}

pub async fn mount_login(server: &MockServer, route_id: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/Login"))
        .respond_with(login_response(route_id))
        .mount(server)
        .await;
}

/// Client with an already-open session (no `ROUTEID`).
pub async fn logged_in_client(server: &MockServer) -> ServiceLayerClient {
    mount_login(server, None).await;
    let client = test_client(server);
    client.login(USERNAME, PASSWORD, COMPANY_DB).await.expect("login");
    client
}
