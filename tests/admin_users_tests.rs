// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin user-management routes.

use axum::http::StatusCode;
use serde_json::{json, Value};
use training_dashboard::db::UserRepository;

mod common;
use common::{body_json, create_test_app, get_request, json_request};

fn row<'a>(panel: &'a Value, id: &str) -> Option<&'a Value> {
    panel["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"] == id)
}

#[tokio::test]
async fn test_non_admin_gets_forbidden() {
    let app = create_test_app();
    let cookie = app.intern_cookie();

    for request in [
        get_request("/api/admin/users", Some(&cookie)),
        get_request("/api/admin/users/new", Some(&cookie)),
        json_request(
            "DELETE",
            "/api/admin/users/uid-ivan",
            Some(&cookie),
            json!({ "confirm": true }),
        ),
    ] {
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // Nothing was read or written on the intern's behalf.
    assert_eq!(app.store.list_calls(), 0);
    assert!(app.store.get_user("uid-ivan").await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = create_test_app();

    let response = app.send(get_request("/api/admin/users", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_filters_snapshot_without_store_read() {
    let app = create_test_app();
    let cookie = app.admin_cookie();

    let response = app.send(get_request("/api/admin/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.store.list_calls(), 1);

    let response = app
        .send(get_request("/api/admin/users/search?q=MARIA", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let panel = body_json(response).await;
    let rows = panel["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "maria@company.com");

    let response = app
        .send(get_request("/api/admin/users/search?q=", Some(&cookie)))
        .await;
    let panel = body_json(response).await;
    assert_eq!(panel["rows"].as_array().unwrap().len(), 3);

    let response = app
        .send(get_request("/api/admin/users/search?q=zzz", Some(&cookie)))
        .await;
    let panel = body_json(response).await;
    assert_eq!(panel["empty_message"], "Пользователи не найдены");

    assert_eq!(app.store.list_calls(), 1);
}

#[tokio::test]
async fn test_search_before_users_tab_load() {
    let app = create_test_app();

    let response = app
        .send(get_request(
            "/api/admin/users/search?q=ivan",
            Some(&app.admin_cookie()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_block_twice_stays_blocked() {
    let app = create_test_app();
    let cookie = app.admin_cookie();

    for _ in 0..2 {
        let response = app
            .send(json_request(
                "POST",
                "/api/admin/users/uid-maria/block",
                Some(&cookie),
                json!({ "blocked": true, "confirm": true }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "✅ Пользователь заблокирован");

        let maria = row(&body["panel"], "uid-maria").unwrap();
        assert_eq!(maria["status"]["label"], "Заблокирован");
        assert_eq!(maria["actions"][1]["label"], "🔓 Разблокировать");
        assert_eq!(maria["actions"][1]["target_blocked"], false);
    }

    let stored = app.store.get_user("uid-maria").await.unwrap().unwrap();
    assert!(stored.blocked);

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/users/uid-maria/block",
            Some(&cookie),
            json!({ "blocked": false, "confirm": true }),
        ))
        .await;
    let body = body_json(response).await;
    assert_eq!(body["message"], "✅ Пользователь разблокирован");
    assert_eq!(
        row(&body["panel"], "uid-maria").unwrap()["status"]["label"],
        "Активен"
    );
}

#[tokio::test]
async fn test_unconfirmed_actions_write_nothing() {
    let app = create_test_app();
    let cookie = app.admin_cookie();

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/users/uid-maria/block",
            Some(&cookie),
            json!({ "blocked": true }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(json_request(
            "DELETE",
            "/api/admin/users/uid-maria",
            Some(&cookie),
            json!({ "confirm": false }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let maria = app.store.get_user("uid-maria").await.unwrap().unwrap();
    assert!(!maria.blocked);
}

#[tokio::test]
async fn test_block_missing_user_reports_store_error() {
    let app = create_test_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/users/uid-nobody/block",
            Some(&app.admin_cookie()),
            json!({ "blocked": true, "confirm": true }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "store_error");
    assert_eq!(body["details"], "No document to update: users/uid-nobody");
}

#[tokio::test]
async fn test_add_user_creates_placeholder_profile() {
    let app = create_test_app();
    let cookie = app.admin_cookie();

    let response = app
        .send(get_request("/api/admin/users/new", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let modal = body_json(response).await;
    assert_eq!(modal["dismiss_on_backdrop"], false);
    assert_eq!(modal["body"]["kind"], "form");

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/users",
            Some(&cookie),
            json!({
                "name": "Пётр Новиков",
                "email": "petr@company.com",
                "password": "secret123",
                "role": "mentor"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "✅ Данные пользователя сохранены в базе данных");
    assert!(body["warning"].as_str().unwrap().starts_with("⚠️"));

    let rows = body["panel"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    let created = rows
        .iter()
        .find(|row| row["email"] == "petr@company.com")
        .unwrap();
    assert!(created["id"].as_str().unwrap().starts_with("temp_"));
    assert_eq!(created["role_label"], "🧑‍🏫 Наставник");

    // Profile only: the new user cannot sign in.
    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            None,
            json!({ "email": "petr@company.com", "password": "secret123" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_user_rejects_invalid_form() {
    let app = create_test_app();
    let cookie = app.admin_cookie();

    for body in [
        json!({ "name": "", "email": "a@company.com", "password": "secret123", "role": "intern" }),
        json!({ "name": "   ", "email": "a@company.com", "password": "secret123", "role": "intern" }),
        json!({ "name": "A", "email": "not-an-email", "password": "secret123", "role": "intern" }),
        json!({ "name": "A", "email": "a@company.com", "password": "123", "role": "intern" }),
        json!({ "name": "A", "email": "a@company.com", "password": "secret123", "role": "owner" }),
    ] {
        let response = app
            .send(json_request("POST", "/api/admin/users", Some(&cookie), body))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.store.count_documents("users").await.unwrap(), 3);
}

#[tokio::test]
async fn test_edit_is_acknowledged_only() {
    let app = create_test_app();

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/users/uid-maria/edit",
            Some(&app.admin_cookie()),
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Редактирование пользователя: uid-maria");
    assert!(body.get("panel").is_none());
}
