//! User data accessor: create/read/delete against the `users` collection.

use sqlx::PgPool;
use uuid::Uuid;

use super::models::user::User;
use super::{is_unique_violation, DatabaseError};

const USER_COLUMNS: &str = "id, name, email, password_hash, avatar, created_at";

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

pub async fn insert(pool: &PgPool, new_user: NewUser) -> Result<User, DatabaseError> {
    let sql = format!(
        "INSERT INTO users (id, name, email, password_hash, avatar) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    );

    let result = sqlx::query_as::<_, User>(&sql)
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.avatar)
        .fetch_one(pool)
        .await;

    match result {
        Ok(user) => Ok(user),
        Err(err) if is_unique_violation(&err) => {
            Err(DatabaseError::Duplicate("User already exists".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}
