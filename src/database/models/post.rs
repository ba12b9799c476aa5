use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Post row as stored: author name/avatar are a snapshot taken at creation.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Wire shape: a post with its likes and comments, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(rename = "text")]
    pub body: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn from_parts(row: PostRow, likes: Vec<Like>, comments: Vec<Comment>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            avatar: row.avatar,
            body: row.body,
            likes,
            comments,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Like {
    #[serde(skip)]
    pub post_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    #[serde(skip)]
    pub post_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(rename = "text")]
    pub body: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_post_serializes_with_expected_fields() {
        let user_id = Uuid::new_v4();
        let row = PostRow {
            id: Uuid::new_v4(),
            user_id,
            name: "Alice".into(),
            avatar: None,
            body: "hello".into(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(Post::from_parts(row, Vec::new(), Vec::new())).unwrap();
        assert_eq!(value["text"], "hello");
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["user"], user_id.to_string());
        assert_eq!(value["likes"], serde_json::json!([]));
        assert_eq!(value["comments"], serde_json::json!([]));
        assert!(value.get("id").is_some());
        assert!(value.get("date").is_some());
        assert!(value.get("body").is_none());
    }

    #[test]
    fn comment_wire_shape_hides_post_id() {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Bob".into(),
            avatar: Some("https://example.com/b.png".into()),
            body: "nice".into(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert!(value.get("post_id").is_none());
        assert_eq!(value["text"], "nice");
        assert!(value.get("user").is_some());
    }
}
