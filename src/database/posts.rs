//! Post data accessor: posts plus their likes and comments sub-lists.
//!
//! Sub-list mutations are single conditional statements (insert-if-absent,
//! delete-matching) so concurrent requests cannot overwrite each other.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::models::post::{Comment, Like, Post, PostRow};
use super::models::user::User;
use super::DatabaseError;

const POST_COLUMNS: &str = "id, user_id, name, avatar, body, created_at";
const LIKE_COLUMNS: &str = "post_id, user_id, created_at";
const COMMENT_COLUMNS: &str = "id, post_id, user_id, name, avatar, body, created_at";

/// Create a post owned by `user`, snapshotting their name and avatar.
pub async fn insert(pool: &PgPool, user: &User, body: &str) -> Result<Post, DatabaseError> {
    let sql = format!(
        "INSERT INTO posts (id, user_id, name, avatar, body) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {POST_COLUMNS}"
    );

    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(body)
        .fetch_one(pool)
        .await?;

    Ok(Post::from_parts(row, Vec::new(), Vec::new()))
}

/// All posts, newest first, each with its likes and comments.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Post>, DatabaseError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC");

    let rows = sqlx::query_as::<_, PostRow>(&sql).fetch_all(pool).await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut likes = likes_for(pool, &ids).await?;
    let mut comments = comments_for(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let post_likes = likes.remove(&row.id).unwrap_or_default();
            let post_comments = comments.remove(&row.id).unwrap_or_default();
            Post::from_parts(row, post_likes, post_comments)
        })
        .collect())
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Post>, DatabaseError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let ids = [row.id];
    let mut likes = likes_for(pool, &ids).await?;
    let mut comments = comments_for(pool, &ids).await?;

    Ok(Some(Post::from_parts(
        row,
        likes.remove(&ids[0]).unwrap_or_default(),
        comments.remove(&ids[0]).unwrap_or_default(),
    )))
}

/// Owning user id of a post, `None` when the post does not exist.
pub async fn owner(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, DatabaseError> {
    let user_id = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user_id)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Add-if-absent like. Returns false when the user already liked the post.
pub async fn like(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) \
         ON CONFLICT (post_id, user_id) DO NOTHING",
    )
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Remove-matching unlike. Returns false when the user had not liked the post.
pub async fn unlike(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Likes on one post, newest first.
pub async fn likes(pool: &PgPool, post_id: Uuid) -> Result<Vec<Like>, DatabaseError> {
    let sql = format!("SELECT {LIKE_COLUMNS} FROM post_likes WHERE post_id = $1 ORDER BY created_at DESC");

    let likes = sqlx::query_as::<_, Like>(&sql)
        .bind(post_id)
        .fetch_all(pool)
        .await?;

    Ok(likes)
}

/// Add a comment authored by `user`, snapshotting their name and avatar.
pub async fn insert_comment(pool: &PgPool, post_id: Uuid, user: &User, body: &str) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO post_comments (id, post_id, user_id, name, avatar, body) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(post_id)
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.avatar)
    .bind(body)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_comment(pool: &PgPool, post_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>, DatabaseError> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM post_comments WHERE id = $1 AND post_id = $2");

    let comment = sqlx::query_as::<_, Comment>(&sql)
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(comment)
}

/// Remove a comment by its own id. The matched id, not the author, selects
/// the row, so deleting one of several comments by the same user removes
/// exactly the targeted one.
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM post_comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Comments on one post, newest first.
pub async fn comments(pool: &PgPool, post_id: Uuid) -> Result<Vec<Comment>, DatabaseError> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM post_comments WHERE post_id = $1 ORDER BY created_at DESC");

    let comments = sqlx::query_as::<_, Comment>(&sql)
        .bind(post_id)
        .fetch_all(pool)
        .await?;

    Ok(comments)
}

async fn likes_for(pool: &PgPool, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Like>>, DatabaseError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!("SELECT {LIKE_COLUMNS} FROM post_likes WHERE post_id = ANY($1) ORDER BY created_at DESC");

    let likes = sqlx::query_as::<_, Like>(&sql)
        .bind(post_ids)
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<Like>> = HashMap::new();
    for like in likes {
        grouped.entry(like.post_id).or_default().push(like);
    }
    Ok(grouped)
}

async fn comments_for(pool: &PgPool, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Comment>>, DatabaseError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql =
        format!("SELECT {COMMENT_COLUMNS} FROM post_comments WHERE post_id = ANY($1) ORDER BY created_at DESC");

    let comments = sqlx::query_as::<_, Comment>(&sql)
        .bind(post_ids)
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in comments {
        grouped.entry(comment.post_id).or_default().push(comment);
    }
    Ok(grouped)
}
