//! Profile data accessor: upsert with partial-field semantics, owner joins,
//! experience/education sub-lists, and account deletion.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::profile::{Education, Experience, Profile, ProfileRow, SocialLinks};
use super::DatabaseError;

const PROFILE_SELECT: &str = "SELECT p.id, p.user_id, u.name AS user_name, u.avatar AS user_avatar, \
     p.company, p.website, p.location, p.bio, p.status, p.github_username, p.skills, p.social, \
     p.created_at, p.updated_at \
     FROM profiles p JOIN users u ON u.id = p.user_id";

const EXPERIENCE_SELECT: &str = "SELECT id, profile_id, title, company, location, from_date, to_date, \
     current, description, created_at FROM profile_experiences";

const EDUCATION_SELECT: &str = "SELECT id, profile_id, school, degree, field_of_study, location, \
     from_date, to_date, current, description, created_at FROM profile_educations";

/// Field set for create-or-update. `status` and `skills` are always present
/// (validated upstream); the rest only overwrite when `Some`.
#[derive(Debug)]
pub struct ProfileFields {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}

#[derive(Debug)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub location: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Create the caller's profile or update it in place. Absent optional fields
/// never overwrite stored values; the social sub-record is replaced
/// wholesale. One atomic statement, so two concurrent submits cannot
/// duplicate a profile.
pub async fn upsert(pool: &PgPool, user_id: Uuid, fields: ProfileFields) -> Result<Profile, DatabaseError> {
    sqlx::query(
        "INSERT INTO profiles (id, user_id, company, website, location, bio, status, github_username, skills, social) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (user_id) DO UPDATE SET \
            company = COALESCE(EXCLUDED.company, profiles.company), \
            website = COALESCE(EXCLUDED.website, profiles.website), \
            location = COALESCE(EXCLUDED.location, profiles.location), \
            bio = COALESCE(EXCLUDED.bio, profiles.bio), \
            github_username = COALESCE(EXCLUDED.github_username, profiles.github_username), \
            status = EXCLUDED.status, \
            skills = EXCLUDED.skills, \
            social = EXCLUDED.social, \
            updated_at = now()",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&fields.company)
    .bind(&fields.website)
    .bind(&fields.location)
    .bind(&fields.bio)
    .bind(&fields.status)
    .bind(&fields.github_username)
    .bind(&fields.skills)
    .bind(Json(&fields.social))
    .execute(pool)
    .await?;

    match find_by_user(pool, user_id).await? {
        Some(profile) => Ok(profile),
        None => Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound)),
    }
}

/// One profile joined with owner name/avatar and both sub-lists.
pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
    let sql = format!("{PROFILE_SELECT} WHERE p.user_id = $1");

    let row = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let ids = [row.id];
    let mut experience = experiences_for(pool, &ids).await?;
    let mut education = educations_for(pool, &ids).await?;

    Ok(Some(Profile::from_parts(
        row,
        experience.remove(&ids[0]).unwrap_or_default(),
        education.remove(&ids[0]).unwrap_or_default(),
    )))
}

/// Every profile joined with owner name/avatar, newest profile first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Profile>, DatabaseError> {
    let sql = format!("{PROFILE_SELECT} ORDER BY p.created_at DESC");

    let rows = sqlx::query_as::<_, ProfileRow>(&sql).fetch_all(pool).await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut experience = experiences_for(pool, &ids).await?;
    let mut education = educations_for(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let exp = experience.remove(&row.id).unwrap_or_default();
            let edu = education.remove(&row.id).unwrap_or_default();
            Profile::from_parts(row, exp, edu)
        })
        .collect())
}

pub async fn id_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Uuid>, DatabaseError> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Insert an experience entry on the caller's profile and return the updated
/// profile. `None` when the caller has no profile yet.
pub async fn add_experience(
    pool: &PgPool,
    user_id: Uuid,
    entry: NewExperience,
) -> Result<Option<Profile>, DatabaseError> {
    let Some(profile_id) = id_for_user(pool, user_id).await? else {
        return Ok(None);
    };

    sqlx::query(
        "INSERT INTO profile_experiences \
         (id, profile_id, title, company, location, from_date, to_date, current, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(&entry.title)
    .bind(&entry.company)
    .bind(&entry.location)
    .bind(entry.from_date)
    .bind(entry.to_date)
    .bind(entry.current)
    .bind(&entry.description)
    .execute(pool)
    .await?;

    find_by_user(pool, user_id).await
}

/// Remove one experience entry by id, scoped to the given profile. Returns
/// the number of rows removed (0 when the id does not match).
pub async fn remove_experience(pool: &PgPool, profile_id: Uuid, exp_id: Uuid) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM profile_experiences WHERE id = $1 AND profile_id = $2")
        .bind(exp_id)
        .bind(profile_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn add_education(
    pool: &PgPool,
    user_id: Uuid,
    entry: NewEducation,
) -> Result<Option<Profile>, DatabaseError> {
    let Some(profile_id) = id_for_user(pool, user_id).await? else {
        return Ok(None);
    };

    sqlx::query(
        "INSERT INTO profile_educations \
         (id, profile_id, school, degree, field_of_study, location, from_date, to_date, current, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(&entry.school)
    .bind(&entry.degree)
    .bind(&entry.field_of_study)
    .bind(&entry.location)
    .bind(entry.from_date)
    .bind(entry.to_date)
    .bind(entry.current)
    .bind(&entry.description)
    .execute(pool)
    .await?;

    find_by_user(pool, user_id).await
}

pub async fn remove_education(pool: &PgPool, profile_id: Uuid, edu_id: Uuid) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM profile_educations WHERE id = $1 AND profile_id = $2")
        .bind(edu_id)
        .bind(profile_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete the caller's posts, profile and user record in one transaction.
pub async fn delete_account(pool: &PgPool, user_id: Uuid) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM posts WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

async fn experiences_for(
    pool: &PgPool,
    profile_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Experience>>, DatabaseError> {
    if profile_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!("{EXPERIENCE_SELECT} WHERE profile_id = ANY($1) ORDER BY created_at DESC, id");

    let entries = sqlx::query_as::<_, Experience>(&sql)
        .bind(profile_ids)
        .fetch_all(pool)
        .await?;

    Ok(group_by_profile(entries, |e| e.profile_id))
}

async fn educations_for(
    pool: &PgPool,
    profile_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Education>>, DatabaseError> {
    if profile_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!("{EDUCATION_SELECT} WHERE profile_id = ANY($1) ORDER BY created_at DESC, id");

    let entries = sqlx::query_as::<_, Education>(&sql)
        .bind(profile_ids)
        .fetch_all(pool)
        .await?;

    Ok(group_by_profile(entries, |e| e.profile_id))
}

fn group_by_profile<T>(entries: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for entry in entries {
        grouped.entry(key(&entry)).or_default().push(entry);
    }
    grouped
}
