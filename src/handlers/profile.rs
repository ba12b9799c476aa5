use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::profile::{Profile, SocialLinks};
use crate::database::profiles::{self, NewEducation, NewExperience, ProfileFields};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::services::github::GithubError;
use crate::state::AppState;
use crate::validation::{parse_skills, Validator};

const NO_PROFILE: &str = "No profile found for this user";

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub status: Option<String>,
    pub skills: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl UpsertProfileRequest {
    /// Copy present fields into the builder record; `status` and `skills`
    /// must already be validated.
    fn into_fields(self, status: String, skills: Vec<String>) -> ProfileFields {
        ProfileFields {
            status,
            skills,
            company: self.company,
            website: self.website,
            location: self.location,
            bio: self.bio,
            github_username: self.github_username,
            social: SocialLinks {
                youtube: self.youtube,
                twitter: self.twitter,
                facebook: self.facebook,
                linkedin: self.linkedin,
                instagram: self.instagram,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddEducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

/// GET /api/profile/me - the caller's profile
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Profile> {
    profiles::find_by_user(&state.pool, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

/// POST /api/profile - create the caller's profile, or update it in place
pub async fn upsert(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> ApiResult<Profile> {
    let mut v = Validator::new();
    let status = v.required("status", payload.status.clone(), "Status is required");
    let skills = v.required("skills", payload.skills.clone(), "Skills are required");
    v.finish()?;

    let fields = payload.into_fields(status, parse_skills(&skills));
    let profile = profiles::upsert(&state.pool, user.id, fields).await?;
    Ok(Json(profile))
}

/// GET /api/profile - every profile (public)
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Profile>> {
    let all = profiles::list_all(&state.pool).await?;
    Ok(Json(all))
}

/// GET /api/profile/user/:user_id - one user's profile (public)
pub async fn by_user(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Profile> {
    let user_id = parse_id(&user_id, NO_PROFILE)?;

    profiles::find_by_user(&state.pool, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

/// DELETE /api/profile - remove the caller's posts, profile and account
pub async fn remove_account(State(state): State<AppState>, user: AuthUser) -> ApiResult<Value> {
    profiles::delete_account(&state.pool, user.id).await?;
    Ok(Json(json!({ "msg": "User deleted" })))
}

/// PUT /api/profile/experience - add an experience entry
pub async fn add_experience(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddExperienceRequest>,
) -> ApiResult<Profile> {
    let mut v = Validator::new();
    let title = v.required("title", payload.title, "Title is required");
    let company = v.required("company", payload.company, "Company is required");
    let from = v.required_date("from", payload.from, "From date is required");
    v.finish()?;

    let entry = NewExperience {
        title,
        company,
        location: payload.location,
        from_date: from.ok_or_else(ApiError::internal)?,
        to_date: payload.to,
        current: payload.current.unwrap_or(false),
        description: payload.description,
    };

    profiles::add_experience(&state.pool, user.id, entry)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

/// DELETE /api/profile/experience/:exp_id - remove one experience entry
pub async fn remove_experience(
    State(state): State<AppState>,
    user: AuthUser,
    Path(exp_id): Path<String>,
) -> ApiResult<Profile> {
    let exp_id = parse_id(&exp_id, "Experience entry not found")?;

    let Some(profile_id) = profiles::id_for_user(&state.pool, user.id).await? else {
        return Err(ApiError::not_found(NO_PROFILE));
    };

    let removed = profiles::remove_experience(&state.pool, profile_id, exp_id).await?;
    if removed == 0 {
        return Err(ApiError::not_found("Experience entry not found"));
    }

    profiles::find_by_user(&state.pool, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

/// PUT /api/profile/education - add an education entry
pub async fn add_education(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddEducationRequest>,
) -> ApiResult<Profile> {
    let mut v = Validator::new();
    let school = v.required("school", payload.school, "School is required");
    let degree = v.required("degree", payload.degree, "Degree is required");
    let field_of_study = v.required("field_of_study", payload.field_of_study, "Field of study is required");
    let from = v.required_date("from", payload.from, "From date is required");
    v.finish()?;

    let entry = NewEducation {
        school,
        degree,
        field_of_study,
        location: payload.location,
        from_date: from.ok_or_else(ApiError::internal)?,
        to_date: payload.to,
        current: payload.current.unwrap_or(false),
        description: payload.description,
    };

    profiles::add_education(&state.pool, user.id, entry)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

/// DELETE /api/profile/education/:edu_id - remove one education entry
pub async fn remove_education(
    State(state): State<AppState>,
    user: AuthUser,
    Path(edu_id): Path<String>,
) -> ApiResult<Profile> {
    let edu_id = parse_id(&edu_id, "Education entry not found")?;

    let Some(profile_id) = profiles::id_for_user(&state.pool, user.id).await? else {
        return Err(ApiError::not_found(NO_PROFILE));
    };

    let removed = profiles::remove_education(&state.pool, profile_id, edu_id).await?;
    if removed == 0 {
        return Err(ApiError::not_found("Education entry not found"));
    }

    profiles::find_by_user(&state.pool, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}

/// GET /api/profile/github/:username - proxied repository listing (public)
pub async fn github_repos(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Value> {
    match state.github.list_repos(&username).await {
        Ok(repos) => Ok(Json(repos)),
        Err(GithubError::NotFound) => Err(ApiError::not_found("No GitHub profile found")),
        Err(GithubError::Transport(err)) => {
            tracing::error!("github lookup failed: {}", err);
            Err(ApiError::internal())
        }
    }
}

/// Malformed identifiers behave like absent records.
fn parse_id(raw: &str, not_found_msg: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found_msg))
}
