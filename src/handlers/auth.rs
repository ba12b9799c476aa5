use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::database::models::user::User;
use crate::database::users;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::Validator;

use super::users::issue_token_for;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth - authenticate with email and password, receive a token
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let mut v = Validator::new();
    let email = v.required_email("email", payload.email, "Please include a valid email");
    let password = v.required_min_len("password", payload.password, 1, "Password is required");
    v.finish()?;

    let Some(user) = users::find_by_email(&state.pool, &email).await? else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !auth::verify_password(&password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token_for(&state, user.id)?;
    Ok(Json(json!({ "token": token })))
}

/// GET /api/auth - the calling user's record, credential hash omitted
pub async fn current_user(State(state): State<AppState>, user: AuthUser) -> ApiResult<User> {
    users::find_by_id(&state.pool, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
