use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::auth::{create_jwt, hash_password, verify_password};
use crate::domain::{DomainError, FieldErrors};
use crate::infrastructure::AppState;
use crate::models::user;

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: Option<String>,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// POST /api/register - create a regular user account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    if payload.username.trim().is_empty() {
        errors
            .entry("username".to_string())
            .or_default()
            .push("This field is required.".to_string());
    }
    if payload.password.is_empty() {
        errors
            .entry("password".to_string())
            .or_default()
            .push("This field is required.".to_string());
    }
    if !errors.is_empty() {
        return Err(DomainError::Validation(errors).into());
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(state.db())
        .await
        .map_err(DomainError::from)?;
    if existing.is_some() {
        return Err(
            DomainError::field("username", "A user with that username already exists.").into(),
        );
    }

    let password_hash = hash_password(&payload.password).map_err(DomainError::Storage)?;

    let now = chrono::Utc::now().to_rfc3339();
    let user = user::ActiveModel {
        username: Set(payload.username),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        role: Set("user".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .map_err(DomainError::from)?;

    tracing::info!("user registered: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

/// POST /api/auth/login - exchange credentials for a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for user: {}", payload.username);

    let user = match user::Entity::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(state.db())
        .await
    {
        Ok(Some(u)) => u,
        _ => {
            tracing::warn!("User not found: {}", payload.username);
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => match create_jwt(&user.username, user.id, &user.role) {
            Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
            Err(e) => {
                tracing::error!("Failed to issue token: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        },
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response()
        }
    }
}
