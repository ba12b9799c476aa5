use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Social links sub-record. Only present links are stored; absent keys stay
/// absent in the persisted JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Profile row joined with its owner's name and avatar.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: Json<SocialLinks>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner snapshot carried on every profile response.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOwner {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

/// Wire shape: one profile with its owner join and both sub-lists.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub user: ProfileOwner,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub github_username: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn from_parts(row: ProfileRow, experience: Vec<Experience>, education: Vec<Education>) -> Self {
        Self {
            id: row.id,
            user: ProfileOwner {
                id: row.user_id,
                name: row.user_name,
                avatar: row.user_avatar,
            },
            company: row.company,
            website: row.website,
            location: row.location,
            bio: row.bio,
            status: row.status,
            github_username: row.github_username,
            skills: row.skills,
            social: row.social.0,
            experience,
            education,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    #[serde(skip)]
    pub profile_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    #[serde(rename = "from")]
    pub from_date: NaiveDate,
    #[serde(rename = "to")]
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Education {
    pub id: Uuid,
    #[serde(skip)]
    pub profile_id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub location: Option<String>,
    #[serde(rename = "from")]
    pub from_date: NaiveDate,
    #[serde(rename = "to")]
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_links_drop_absent_keys() {
        let social = SocialLinks {
            twitter: Some("https://twitter.com/alice".into()),
            ..Default::default()
        };

        let value = serde_json::to_value(&social).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["twitter"], "https://twitter.com/alice");
    }

    #[test]
    fn experience_uses_from_and_to_on_the_wire() {
        let exp = Experience {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            title: "Engineer".into(),
            company: "Acme".into(),
            location: None,
            from_date: NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
            to_date: None,
            current: true,
            description: None,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&exp).unwrap();
        assert_eq!(value["from"], "2019-01-02");
        assert!(value.get("from_date").is_none());
        assert!(value.get("profile_id").is_none());
        assert_eq!(value["current"], true);
    }
}
