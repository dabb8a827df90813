// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use training_dashboard::error::{AppError, INVALID_CREDENTIALS_MESSAGE};

async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_authentication_failure_is_generic() {
    let (status, body) = body_of(AppError::AuthenticationFailed).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication_failed");
    assert_eq!(body["details"], INVALID_CREDENTIALS_MESSAGE);
}

#[tokio::test]
async fn test_store_error_details_are_verbatim() {
    let raw = "7 PERMISSION_DENIED: Missing or insufficient permissions.";
    let (status, body) = body_of(AppError::Database(raw.to_string())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "store_error");
    assert_eq!(body["details"], raw);
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (status, body) = body_of(AppError::Internal(anyhow::anyhow!("secret detail"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_profile_missing_and_confirmation() {
    let (status, body) = body_of(AppError::ProfileMissing("uid-ghost".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "profile_missing");

    let (status, body) = body_of(AppError::ConfirmationRequired).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "confirmation_required");
}
