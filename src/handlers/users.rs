use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::database::users::{self, NewUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::Validator;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

/// POST /api/users - register a new user and receive a signed token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Value> {
    let mut v = Validator::new();
    let name = v.required("name", payload.name, "Name is required");
    let email = v.required_email("email", payload.email, "Please include a valid email");
    let password = v.required_min_len(
        "password",
        payload.password,
        6,
        "Please enter a password with 6 or more characters",
    );
    v.finish()?;

    if users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = auth::hash_password(&password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal()
    })?;

    let user = users::insert(
        &state.pool,
        NewUser {
            name,
            email,
            password_hash,
            avatar: payload.avatar,
        },
    )
    .await?;

    let token = issue_token_for(&state, user.id)?;
    Ok(Json(json!({ "token": token })))
}

pub(super) fn issue_token_for(state: &AppState, user_id: uuid::Uuid) -> Result<String, ApiError> {
    let claims = Claims::new(user_id, state.config.security.jwt_expiry_hours);
    auth::issue_token(&claims, &state.config.security.jwt_secret).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal()
    })
}
