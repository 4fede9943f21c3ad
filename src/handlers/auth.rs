use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::models::User;
use crate::state::AppState;
use crate::store::{Filter, StoreError};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct SignupPayload {
    id: String,
}

#[derive(Serialize)]
struct TokenPayload {
    access_token: String,
    token_type: &'static str,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Response, AppError> {
    let email = request.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::Validation("Email must not be empty".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".to_string()));
    }

    let existing = state
        .store
        .users
        .find_one(&Filter::new().eq("email", email.as_str()))
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = User {
        email: email.clone(),
        password_hash: hash_password(&request.password)?,
        created_at: Utc::now(),
    };
    let body = serde_json::to_value(&user).map_err(StoreError::from)?;
    let id = state.store.users.insert_one(body).await?;
    info!(email = %email, "User registered");

    Ok(created(
        SignupPayload { id: id.to_string() },
        "User registered successfully",
    )
    .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let doc = state
        .store
        .users
        .find_one(&Filter::new().eq("email", request.email.as_str()))
        .await?;

    // Unknown email and wrong password fail identically.
    let user: User = match doc {
        Some(doc) => serde_json::from_value(doc.body).map_err(StoreError::from)?,
        None => return Err(AppError::Unauthenticated("Invalid credentials".to_string())),
    };
    if !verify_password(&request.password, &user.password_hash) {
        return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
    }

    let token = state.tokens.issue(&user.email)?;
    Ok(success(
        TokenPayload {
            access_token: token,
            token_type: "bearer",
        },
        "Login successful",
    )
    .into_response())
}
