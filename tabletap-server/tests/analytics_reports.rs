//! Analytics report endpoint tests
//!
//! Daily and monthly rollups plus the top-items ranking. Orders are placed
//! and walked to `served` through the HTTP API so the reports see exactly
//! what production would.

mod common;

use common::{create_menu_item, create_table, error_code, place_order, register_tenant, spawn};
use chrono::{Datelike, Utc};
use serde_json::json;

async fn serve(server: &common::TestServer, token: &str, order_id: &str) {
    let path = format!("/api/orders/{order_id}/status");
    for next in ["preparing", "ready", "served"] {
        let (status, body) = server.put(&path, Some(token), json!({ "status": next })).await;
        assert_eq!(status, 200, "transition to {next}: {body}");
    }
}

#[tokio::test]
async fn daily_report_rolls_up_todays_orders() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;
    let (_, qr) = create_table(&server, &owner.token, 1).await;
    let soup = create_menu_item(&server, &owner.token, "Soup", 40.0).await;

    // Two served, one left pending, one cancelled
    let first = place_order(&server, &qr, json!([{ "menu_item_id": soup, "quantity": 1 }])).await;
    let second = place_order(&server, &qr, json!([{ "menu_item_id": soup, "quantity": 2 }])).await;
    let _pending = place_order(&server, &qr, json!([{ "menu_item_id": soup, "quantity": 1 }])).await;
    let cancelled = place_order(&server, &qr, json!([{ "menu_item_id": soup, "quantity": 5 }])).await;

    serve(&server, &owner.token, &first).await;
    serve(&server, &owner.token, &second).await;
    let (status, _) = server
        .put(
            &format!("/api/orders/{cancelled}/status"),
            Some(&owner.token),
            json!({ "status": "cancelled", "cancel_reason": "Kitchen out of stock" }),
        )
        .await;
    assert_eq!(status, 200);

    let (status, body) = server.get("/api/analytics/daily", Some(&owner.token)).await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], json!("Daily sales report fetched successfully"));
    assert_eq!(
        body["data"]["date"],
        json!(Utc::now().date_naive().format("%Y-%m-%d").to_string())
    );

    let metrics = &body["data"]["metrics"];
    assert_eq!(metrics["total_orders"], json!(4));
    assert_eq!(metrics["served_orders"], json!(2));
    assert_eq!(metrics["pending_orders"], json!(1));
    assert_eq!(metrics["cancelled_orders"], json!(1));
    // Revenue counts served orders only: 40 + 80, never the cancelled 200
    assert_eq!(metrics["total_revenue"], json!(120.0));
    assert_eq!(metrics["average_order_value"], json!(60.0));

    let peak_hours = body["data"]["peak_hours"].as_array().expect("histogram");
    assert_eq!(peak_hours.len(), 24);
    let placed: u64 = peak_hours.iter().map(|h| h.as_u64().unwrap_or(0)).sum();
    assert_eq!(placed, 4);

    // A day nothing happened on reads as all zeros
    let (status, body) = server
        .get("/api/analytics/daily?date=2020-01-01", Some(&owner.token))
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["metrics"]["total_orders"], json!(0));
    assert_eq!(body["data"]["metrics"]["average_order_value"], json!(0.0));
}

#[tokio::test]
async fn monthly_report_requires_year_and_month() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;

    let (status, body) = server.get("/api/analytics/monthly", Some(&owner.token)).await;
    assert_eq!(status, 400, "body: {body}");
    assert_eq!(error_code(&body), 2);
    assert_eq!(body["message"], json!("Year and month are required"));

    let (status, body) = server
        .get("/api/analytics/monthly?year=2026&month=13", Some(&owner.token))
        .await;
    assert_eq!(status, 400, "body: {body}");
    assert_eq!(error_code(&body), 2);
}

#[tokio::test]
async fn monthly_report_includes_top_items() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;
    let (_, qr) = create_table(&server, &owner.token, 1).await;
    let soup = create_menu_item(&server, &owner.token, "Soup", 40.0).await;
    let tea = create_menu_item(&server, &owner.token, "Iced Tea", 10.0).await;

    let order = place_order(
        &server,
        &qr,
        json!([
            { "menu_item_id": soup, "quantity": 1 },
            { "menu_item_id": tea, "quantity": 6 },
        ]),
    )
    .await;
    serve(&server, &owner.token, &order).await;

    let now = Utc::now();
    let (status, body) = server
        .get(
            &format!(
                "/api/analytics/monthly?year={}&month={}",
                now.year(),
                now.month()
            ),
            Some(&owner.token),
        )
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["year"], json!(now.year()));
    assert_eq!(body["data"]["month"], json!(now.month()));
    assert_eq!(body["data"]["metrics"]["served_orders"], json!(1));
    assert_eq!(body["data"]["metrics"]["total_revenue"], json!(100.0));

    // Ranked by revenue: 6 teas (60) beat 1 soup (40)
    let top = body["data"]["top_items"].as_array().expect("top items");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["name"], json!("Iced Tea"));
    assert_eq!(top[0]["total_quantity"], json!(6));
    assert_eq!(top[0]["total_revenue"], json!(60.0));
    assert_eq!(top[1]["name"], json!("Soup"));
}

#[tokio::test]
async fn top_items_ranks_served_revenue_only() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;
    let (_, qr) = create_table(&server, &owner.token, 1).await;
    let soup = create_menu_item(&server, &owner.token, "Soup", 40.0).await;
    let tea = create_menu_item(&server, &owner.token, "Iced Tea", 10.0).await;

    let served = place_order(
        &server,
        &qr,
        json!([
            { "menu_item_id": soup, "quantity": 2 },
            { "menu_item_id": tea, "quantity": 1 },
        ]),
    )
    .await;
    serve(&server, &owner.token, &served).await;

    // Still pending, so its lines must not rank
    let _unserved =
        place_order(&server, &qr, json!([{ "menu_item_id": tea, "quantity": 50 }])).await;

    let (status, body) = server
        .get("/api/analytics/top-items", Some(&owner.token))
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["period"], json!("Last 30 days"));
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], json!("Soup"));
    assert_eq!(items[0]["total_revenue"], json!(80.0));
    assert_eq!(items[1]["name"], json!("Iced Tea"));
    assert_eq!(items[1]["total_quantity"], json!(1));

    // The limit caps the ranking length
    let (status, body) = server
        .get("/api/analytics/top-items?limit=1", Some(&owner.token))
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));

    let (_, body) = server
        .get("/api/analytics/top-items?days=90", Some(&owner.token))
        .await;
    assert_eq!(body["data"]["period"], json!("Last 90 days"));
}
