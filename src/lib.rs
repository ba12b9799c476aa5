pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod validation;

use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public service surface
        .route("/", get(root))
        .route("/health", get(health))
        // API surface
        .merge(user_routes())
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(post_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new().route("/api/users", post(users::register))
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new().route("/api/auth", get(auth::current_user).post(auth::login))
}

fn profile_routes() -> Router<AppState> {
    use handlers::profile;

    Router::new()
        .route(
            "/api/profile",
            get(profile::list).post(profile::upsert).delete(profile::remove_account),
        )
        .route("/api/profile/me", get(profile::me))
        .route("/api/profile/user/:user_id", get(profile::by_user))
        .route("/api/profile/experience", put(profile::add_experience))
        .route("/api/profile/experience/:exp_id", delete(profile::remove_experience))
        .route("/api/profile/education", put(profile::add_education))
        .route("/api/profile/education/:edu_id", delete(profile::remove_education))
        .route("/api/profile/github/:username", get(profile::github_repos))
}

fn post_routes() -> Router<AppState> {
    use handlers::posts;

    Router::new()
        .route("/api/posts", post(posts::create).get(posts::list))
        .route("/api/posts/:id", get(posts::get_one).delete(posts::remove))
        .route("/api/posts/like/:id", put(posts::like))
        .route("/api/posts/unlike/:id", put(posts::unlike))
        .route("/api/posts/comment/:id", post(posts::comment))
        .route("/api/posts/comment/:id/:comment_id", delete(posts::remove_comment))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "DevConnect API",
        "version": version,
        "endpoints": {
            "users": "POST /api/users (public - registration)",
            "auth": "POST /api/auth (public - login), GET /api/auth (protected)",
            "profile": "/api/profile[/me|/user/:user_id|/experience|/education|/github/:username]",
            "posts": "/api/posts[/:id|/like/:id|/unlike/:id|/comment/:id[/:comment_id]]",
        }
    }))
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
