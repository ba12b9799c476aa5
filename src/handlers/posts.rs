use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::post::{Comment, Like, Post};
use crate::database::models::user::User;
use crate::database::{posts, users};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::Validator;

const NO_POST: &str = "No post found";

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub text: Option<String>,
}

/// POST /api/posts - create a post owned by the caller
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PostBody>,
) -> ApiResult<Post> {
    let mut v = Validator::new();
    let text = v.required("text", payload.text, "Text is required");
    v.finish()?;

    let author = load_author(&state, user.id).await?;
    let post = posts::insert(&state.pool, &author, &text).await?;
    Ok(Json(post))
}

/// GET /api/posts - all posts, newest first
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Vec<Post>> {
    let all = posts::list_all(&state.pool).await?;
    Ok(Json(all))
}

/// GET /api/posts/:id - one post
pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let id = parse_post_id(&id)?;

    posts::find(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_POST))
}

/// DELETE /api/posts/:id - remove a post (owner only)
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_post_id(&id)?;

    let Some(owner) = posts::owner(&state.pool, id).await? else {
        return Err(ApiError::not_found(NO_POST));
    };
    if owner != user.id {
        return Err(ApiError::forbidden("Not authorized to delete this post"));
    }

    posts::delete(&state.pool, id).await?;
    Ok(Json(json!({ "msg": "Post removed" })))
}

/// PUT /api/posts/like/:id - like a post, at most once per user
pub async fn like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<Like>> {
    let id = parse_post_id(&id)?;

    if posts::owner(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found(NO_POST));
    }

    if !posts::like(&state.pool, id, user.id).await? {
        return Err(ApiError::conflict("Post already liked"));
    }

    let likes = posts::likes(&state.pool, id).await?;
    Ok(Json(likes))
}

/// PUT /api/posts/unlike/:id - remove the caller's like
pub async fn unlike(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<Like>> {
    let id = parse_post_id(&id)?;

    if posts::owner(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found(NO_POST));
    }

    if !posts::unlike(&state.pool, id, user.id).await? {
        return Err(ApiError::conflict("Post has not yet been liked"));
    }

    let likes = posts::likes(&state.pool, id).await?;
    Ok(Json(likes))
}

/// POST /api/posts/comment/:id - comment on a post
pub async fn comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<PostBody>,
) -> ApiResult<Vec<Comment>> {
    let id = parse_post_id(&id)?;

    let mut v = Validator::new();
    let text = v.required("text", payload.text, "Text is required");
    v.finish()?;

    if posts::owner(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found(NO_POST));
    }

    let author = load_author(&state, user.id).await?;
    posts::insert_comment(&state.pool, id, &author, &text).await?;

    let comments = posts::comments(&state.pool, id).await?;
    Ok(Json(comments))
}

/// DELETE /api/posts/comment/:id/:comment_id - remove a comment (author only)
pub async fn remove_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Vec<Comment>> {
    let id = parse_post_id(&id)?;
    let comment_id =
        Uuid::parse_str(&comment_id).map_err(|_| ApiError::not_found("Comment does not exist"))?;

    let Some(found) = posts::find_comment(&state.pool, id, comment_id).await? else {
        return Err(ApiError::not_found("Comment does not exist"));
    };
    if found.user_id != user.id {
        return Err(ApiError::forbidden("Not authorized to delete this comment"));
    }

    // Remove the matched comment by its id, never by the caller's position.
    posts::delete_comment(&state.pool, found.id).await?;

    let comments = posts::comments(&state.pool, id).await?;
    Ok(Json(comments))
}

async fn load_author(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

fn parse_post_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(NO_POST))
}
