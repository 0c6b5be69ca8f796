//! Authentication and authorization flow tests
//!
//! Registration, owner and staff login, token refresh, capability gates per
//! role and the credential-route rate limit. Each test boots its own server
//! because the login rate limit counts per process.

mod common;

use common::{error_code, register_tenant, spawn};
use serde_json::json;

#[tokio::test]
async fn register_and_login_flow() {
    let server = spawn().await;

    let (status, body) = server
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Golden Wok",
                "email": "owner@goldenwok.example",
                "password": "Password123",
                "city": "Lisbon",
            }),
        )
        .await;
    assert_eq!(status, 201, "body: {body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Restaurant registered successfully"));
    assert_eq!(body["data"]["restaurant"]["name"], json!("Golden Wok"));
    assert_eq!(body["data"]["restaurant"]["email"], json!("owner@goldenwok.example"));
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());

    // The email is taken now
    let (status, body) = server
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Copycat",
                "email": "Owner@GoldenWok.example",
                "password": "Password123",
            }),
        )
        .await;
    assert_eq!(status, 409, "body: {body}");
    assert_eq!(error_code(&body), 3002);

    let (status, body) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "owner@goldenwok.example", "password": "Password123" }),
        )
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], json!("Login successful"));
    let token = body["data"]["access_token"].as_str().expect("token").to_string();

    let (status, body) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "owner@goldenwok.example", "password": "WrongPassword" }),
        )
        .await;
    assert_eq!(status, 401, "body: {body}");
    assert_eq!(error_code(&body), 1002);
    assert_eq!(body["message"], json!("Invalid email or password"));

    let (status, body) = server.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["user"]["email"], json!("owner@goldenwok.example"));
    assert_eq!(body["data"]["user"]["role"], json!("owner"));

    // Protected routes refuse anonymous callers
    let (status, body) = server.get("/api/auth/me", None).await;
    assert_eq!(status, 401, "body: {body}");
    assert_eq!(error_code(&body), 1001);
}

#[tokio::test]
async fn staff_accounts_and_capability_gates() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;

    // The owner role itself is not assignable
    let (status, body) = server
        .post(
            "/api/staff",
            Some(&owner.token),
            json!({
                "name": "Impostor",
                "email": "impostor@goldenwok.example",
                "password": "Password123",
                "role": "owner",
            }),
        )
        .await;
    assert_eq!(status, 400, "body: {body}");
    assert_eq!(error_code(&body), 7002);

    let (status, body) = server
        .post(
            "/api/staff",
            Some(&owner.token),
            json!({
                "name": "Cook",
                "email": "cook@goldenwok.example",
                "password": "Password123",
                "role": "kitchen_staff",
            }),
        )
        .await;
    assert_eq!(status, 201, "body: {body}");
    assert_eq!(body["data"]["role"], json!("kitchen_staff"));
    assert_eq!(body["data"]["is_active"], json!(true));
    let staff_id = body["data"]["id"].as_str().expect("staff id").to_string();

    // One account per email
    let (status, body) = server
        .post(
            "/api/staff",
            Some(&owner.token),
            json!({
                "name": "Cook Again",
                "email": "cook@goldenwok.example",
                "password": "Password123",
                "role": "manager",
            }),
        )
        .await;
    assert_eq!(status, 409, "body: {body}");
    assert_eq!(error_code(&body), 3002);

    let (status, body) = server
        .post(
            "/api/auth/staff/login",
            None,
            json!({ "email": "cook@goldenwok.example", "password": "Password123" }),
        )
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], json!("Staff login successful"));
    assert_eq!(body["data"]["user"]["role"], json!("kitchen_staff"));
    assert_eq!(body["data"]["restaurant"]["id"], json!(owner.tenant_id));
    let staff_token = body["data"]["access_token"].as_str().expect("token").to_string();

    // Kitchen staff can watch and work the queue
    let (status, _) = server.get("/api/kitchen/orders", Some(&staff_token)).await;
    assert_eq!(status, 200);
    let (status, _) = server.get("/api/orders", Some(&staff_token)).await;
    assert_eq!(status, 200);

    // But not read analytics, manage the floor plan, or hire
    let (status, body) = server.get("/api/analytics/daily", Some(&staff_token)).await;
    assert_eq!(status, 403, "body: {body}");
    assert_eq!(error_code(&body), 2001);
    assert_eq!(body["errors"]["details"]["userRole"], json!("kitchen_staff"));

    let (status, body) = server
        .post(
            "/api/tables",
            Some(&staff_token),
            json!({ "table_number": 1, "capacity": 4 }),
        )
        .await;
    assert_eq!(status, 403, "body: {body}");
    assert_eq!(error_code(&body), 2001);

    let (status, body) = server.get("/api/staff", Some(&staff_token)).await;
    assert_eq!(status, 403, "body: {body}");
    assert_eq!(error_code(&body), 2001);

    // Deactivation closes the account
    let (status, body) = server
        .delete(&format!("/api/staff/{staff_id}"), Some(&owner.token))
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], json!("Staff user deactivated successfully"));

    let (status, body) = server
        .post(
            "/api/auth/staff/login",
            None,
            json!({ "email": "cook@goldenwok.example", "password": "Password123" }),
        )
        .await;
    assert_eq!(status, 403, "body: {body}");
    assert_eq!(error_code(&body), 1005);
}

#[tokio::test]
async fn refresh_tokens_mint_access_but_never_pass_as_one() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;

    let (status, body) = server
        .post(
            "/api/auth/refresh-token",
            None,
            json!({ "refresh_token": owner.refresh_token }),
        )
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], json!("Token refreshed"));
    let fresh = body["data"]["access_token"].as_str().expect("token").to_string();

    let (status, _) = server.get("/api/auth/me", Some(&fresh)).await;
    assert_eq!(status, 200);

    // A refresh token presented as a bearer access token is refused
    let (status, body) = server.get("/api/auth/me", Some(&owner.refresh_token)).await;
    assert_eq!(status, 401, "body: {body}");
    assert_eq!(error_code(&body), 1004);

    let (status, body) = server.get("/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, 401, "body: {body}");
    assert_eq!(error_code(&body), 1004);

    // And an access token cannot refresh
    let (status, body) = server
        .post(
            "/api/auth/refresh-token",
            None,
            json!({ "refresh_token": owner.token }),
        )
        .await;
    assert_eq!(status, 401, "body: {body}");
    assert_eq!(error_code(&body), 1004);
}

#[tokio::test]
async fn login_flood_gets_rate_limited() {
    let server = spawn().await;

    // Five attempts fill the window; every one fails slowly with 401
    for _ in 0..5 {
        let (status, _) = server
            .post(
                "/api/auth/login",
                None,
                json!({ "email": "nobody@example.com", "password": "WrongPassword" }),
            )
            .await;
        assert_eq!(status, 401);
    }

    // The sixth never reaches the credential check
    let (status, body) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "WrongPassword" }),
        )
        .await;
    assert_eq!(status, 429, "body: {body}");
    assert_eq!(error_code(&body), 9003);
}

#[tokio::test]
async fn password_change_invalidates_the_old_credential() {
    let server = spawn().await;
    let owner = register_tenant(&server, "Golden Wok", "owner@goldenwok.example").await;

    let (status, body) = server
        .put(
            "/api/auth/change-password",
            Some(&owner.token),
            json!({ "current_password": "WrongPassword", "new_password": "NewPassword456" }),
        )
        .await;
    assert_eq!(status, 401, "body: {body}");
    assert_eq!(error_code(&body), 1002);

    let (status, body) = server
        .put(
            "/api/auth/change-password",
            Some(&owner.token),
            json!({ "current_password": "Password123", "new_password": "NewPassword456" }),
        )
        .await;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], json!("Password changed successfully"));

    let (status, _) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "owner@goldenwok.example", "password": "Password123" }),
        )
        .await;
    assert_eq!(status, 401);

    let (status, _) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "owner@goldenwok.example", "password": "NewPassword456" }),
        )
        .await;
    assert_eq!(status, 200);
}
