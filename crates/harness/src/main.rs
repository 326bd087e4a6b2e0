//! Console harness for the SAP Business One Service Layer client.
//!
//! Logs in, runs the demonstration calls and logs out. Each call reports its
//! outcome at this boundary; a failed call does not stop the remaining ones.
//! Only a failed login ends the run early, since nothing else can work
//! without a session.

use anyhow::Context;
use b1sl_client::{ServiceLayerClient, ServiceLayerConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(_) => info!("no .env file found, using process environment"),
    }

    let config = ServiceLayerConfig::from_env().context("reading configuration")?;
    let username = config.username.clone();
    let password = config.password.clone();
    let company_db = config.company_db.clone();
    let page_size = config.page_size;

    let client = ServiceLayerClient::new(config).context("building client")?;

    match client.login(&username, &password, &company_db).await {
        Ok(session) => {
            info!(
                version = session.version.as_deref().unwrap_or("unknown"),
                timeout_minutes = session.session_timeout,
                clustered = session.route_id.is_some(),
                "logged in"
            );
        }
        Err(err) => {
            error!(%err, "login failed, ending run");
            return Ok(());
        }
    }

    run_demonstrations(&client, page_size).await;

    if let Err(err) = client.logout().await {
        warn!(%err, "logout failed");
    }

    Ok(())
}

async fn run_demonstrations(client: &ServiceLayerClient, page_size: u32) {
    match client.list_items(page_size).await {
        Ok(items) => {
            info!(count = items.len(), "listed items");
            for item in items.iter().take(usize::try_from(page_size).unwrap_or(10)) {
                info!(code = %item.item_code, name = item.item_name.as_deref().unwrap_or(""), "item");
            }
        }
        Err(err) => error!(%err, "listing items failed"),
    }

    match client.get_item("A00001").await {
        Ok(Some(item)) => info!(
            code = %item.item_code,
            name = item.item_name.as_deref().unwrap_or(""),
            frozen = item.frozen.as_deref().unwrap_or("tNO"),
            "fetched item"
        ),
        Ok(None) => warn!(code = "A00001", "item not found"),
        Err(err) => error!(%err, "fetching item failed"),
    }

    match client.get_business_partner("C20000").await {
        Ok(Some(partner)) => info!(
            code = %partner.card_code,
            name = partner.card_name.as_deref().unwrap_or(""),
            "fetched business partner"
        ),
        Ok(None) => warn!(code = "C20000", "business partner not found"),
        Err(err) => error!(%err, "fetching business partner failed"),
    }

    match client.list_orders_above(1000.0).await {
        Ok(orders) => {
            info!(count = orders.len(), threshold = 1000.0, "listed orders");
            for order in &orders {
                info!(
                    doc_entry = order.doc_entry,
                    card_code = order.card_code.as_deref().unwrap_or(""),
                    total = order.doc_total,
                    "order"
                );
            }
        }
        Err(err) => error!(%err, "listing orders failed"),
    }

    match client.create_sales_order("C20000", "A00001", 100.0).await {
        Ok(order) => info!(doc_num = order.doc_num, "created sales order"),
        Err(err) => error!(%err, "creating sales order failed"),
    }

    match client.batch_fetch(&["A00001", "A00002"]).await {
        Ok(items) => info!(count = items.len(), "batch fetch succeeded"),
        Err(err) => error!(%err, "batch fetch failed"),
    }
}
