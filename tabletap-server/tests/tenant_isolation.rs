//! Cross-tenant isolation tests
//!
//! Two restaurants live in the same database; nothing one does may be
//! visible to the other. Foreign rows read as absent (404, never 403) so
//! responses do not reveal that the row exists at all.

mod common;

use common::{
    Session, TestServer, create_menu_item, create_table, error_code, place_order, register_tenant,
    spawn,
};
use serde_json::json;

struct TwoTenants {
    server: TestServer,
    alpha: Session,
    beta: Session,
}

async fn two_tenants() -> TwoTenants {
    let server = spawn().await;
    let alpha = register_tenant(&server, "Alpha Diner", "owner@alpha.example").await;
    let beta = register_tenant(&server, "Beta Bistro", "owner@beta.example").await;
    TwoTenants {
        server,
        alpha,
        beta,
    }
}

#[tokio::test]
async fn orders_are_invisible_across_tenants() {
    let t = two_tenants().await;
    let (_, qr) = create_table(&t.server, &t.alpha.token, 1).await;
    let item = create_menu_item(&t.server, &t.alpha.token, "Soup", 30.0).await;
    let order_id = place_order(&t.server, &qr, json!([{ "menu_item_id": item, "quantity": 1 }])).await;

    // The owner sees their own order
    let (status, _) = t
        .server
        .get(&format!("/api/orders/{order_id}"), Some(&t.alpha.token))
        .await;
    assert_eq!(status, 200);

    // The other tenant gets the same response as for a nonexistent order
    let (status, body) = t
        .server
        .get(&format!("/api/orders/{order_id}"), Some(&t.beta.token))
        .await;
    assert_eq!(status, 404, "body: {body}");
    assert_eq!(error_code(&body), 4001);

    // And their listing stays empty
    let (status, body) = t.server.get("/api/orders", Some(&t.beta.token)).await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["total"], json!(0));
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));

    let (_, body) = t.server.get("/api/kitchen/orders", Some(&t.beta.token)).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn status_updates_cannot_reach_foreign_orders() {
    let t = two_tenants().await;
    let (_, qr) = create_table(&t.server, &t.alpha.token, 1).await;
    let item = create_menu_item(&t.server, &t.alpha.token, "Soup", 30.0).await;
    let order_id = place_order(&t.server, &qr, json!([{ "menu_item_id": item, "quantity": 1 }])).await;

    let (status, body) = t
        .server
        .put(
            &format!("/api/orders/{order_id}/status"),
            Some(&t.beta.token),
            json!({ "status": "preparing" }),
        )
        .await;
    assert_eq!(status, 404, "body: {body}");
    assert_eq!(error_code(&body), 4001);

    // The order is untouched
    let (_, body) = t
        .server
        .get(&format!("/api/orders/{order_id}"), Some(&t.alpha.token))
        .await;
    assert_eq!(body["data"]["status"], json!("pending"));
}

#[tokio::test]
async fn tables_and_menu_items_do_not_leak() {
    let t = two_tenants().await;
    let (table_id, _) = create_table(&t.server, &t.alpha.token, 1).await;
    let item = create_menu_item(&t.server, &t.alpha.token, "Soup", 30.0).await;

    let (status, body) = t
        .server
        .get(&format!("/api/tables/{table_id}"), Some(&t.beta.token))
        .await;
    assert_eq!(status, 404, "body: {body}");
    assert_eq!(error_code(&body), 5001);

    let (status, body) = t
        .server
        .put(
            &format!("/api/menu/{item}"),
            Some(&t.beta.token),
            json!({ "price": 1.0 }),
        )
        .await;
    assert_eq!(status, 404, "body: {body}");
    assert_eq!(error_code(&body), 6001);

    // Both tenants can use the same table number; numbers are per-tenant
    let (status, _) = t
        .server
        .post(
            "/api/tables",
            Some(&t.beta.token),
            json!({ "table_number": 1, "capacity": 2 }),
        )
        .await;
    assert_eq!(status, 201);

    let (_, body) = t.server.get("/api/tables", Some(&t.beta.token)).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    let (_, body) = t.server.get("/api/menu", Some(&t.beta.token)).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn explicit_tenant_references_must_match_the_token() {
    let t = two_tenants().await;

    // Query-string tenant_id pointing at the other restaurant
    let (status, body) = t
        .server
        .get(
            &format!("/api/orders?tenant_id={}", t.beta.tenant_id),
            Some(&t.alpha.token),
        )
        .await;
    assert_eq!(status, 403, "body: {body}");
    assert_eq!(error_code(&body), 2002);

    // The caller's own tenant id is redundant but allowed
    let (status, _) = t
        .server
        .get(
            &format!("/api/orders?tenant_id={}", t.alpha.tenant_id),
            Some(&t.alpha.token),
        )
        .await;
    assert_eq!(status, 200);

    // Smuggling the foreign id through the body is caught the same way
    let (status, body) = t
        .server
        .post(
            "/api/tables",
            Some(&t.alpha.token),
            json!({
                "table_number": 4,
                "capacity": 4,
                "tenant_id": t.beta.tenant_id,
            }),
        )
        .await;
    assert_eq!(status, 403, "body: {body}");
    assert_eq!(error_code(&body), 2002);
}

#[tokio::test]
async fn analytics_only_count_the_callers_tenant() {
    let t = two_tenants().await;
    let (_, qr) = create_table(&t.server, &t.alpha.token, 1).await;
    let item = create_menu_item(&t.server, &t.alpha.token, "Soup", 30.0).await;
    let order_id = place_order(&t.server, &qr, json!([{ "menu_item_id": item, "quantity": 1 }])).await;

    // Serve the order so it counts as revenue
    let path = format!("/api/orders/{order_id}/status");
    for next in ["preparing", "ready", "served"] {
        let (status, _) = t
            .server
            .put(&path, Some(&t.alpha.token), json!({ "status": next }))
            .await;
        assert_eq!(status, 200);
    }

    let (status, body) = t
        .server
        .get("/api/analytics/daily", Some(&t.alpha.token))
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["metrics"]["total_orders"], json!(1));
    assert_eq!(body["data"]["metrics"]["total_revenue"], json!(30.0));

    let (status, body) = t
        .server
        .get("/api/analytics/daily", Some(&t.beta.token))
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["metrics"]["total_orders"], json!(0));
    assert_eq!(body["data"]["metrics"]["total_revenue"], json!(0.0));
    assert_eq!(body["data"]["metrics"]["average_order_value"], json!(0.0));
}
