//! Outbound GitHub repository lookup.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::config::GithubConfig;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("no GitHub profile found")]
    NotFound,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Read-only client for the repository-listing API. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, reqwest::Error> {
        // The upstream call gets a bounded timeout; a hung lookup must not
        // hold the request open indefinitely.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("devconnect-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// The user's five oldest repositories, as the upstream JSON array.
    /// Any non-success upstream status maps to `NotFound`.
    pub async fn list_repos(&self, username: &str) -> Result<Value, GithubError> {
        let response = self.repos_request(username).send().await?;

        if !response.status().is_success() {
            return Err(GithubError::NotFound);
        }

        Ok(response.json().await?)
    }

    fn repos_request(&self, username: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/users/{}/repos", self.api_base, username);
        let mut request = self
            .http
            .get(url)
            .query(&[("per_page", "5"), ("sort", "created:asc")]);

        if let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) {
            request = request.query(&[("client_id", id.as_str()), ("client_secret", secret.as_str())]);
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: Option<&str>, secret: Option<&str>) -> GithubClient {
        GithubClient::new(&GithubConfig {
            client_id: id.map(String::from),
            client_secret: secret.map(String::from),
            api_base: "https://api.github.com/".into(),
            request_timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn request_uses_fixed_pagination_and_order() {
        let request = client(None, None).repos_request("octocat").build().unwrap();
        let url = request.url();

        assert_eq!(url.path(), "/users/octocat/repos");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("per_page".into(), "5".into())));
        assert!(query.contains(&("sort".into(), "created:asc".into())));
        assert!(!query.iter().any(|(k, _)| k == "client_id"));
    }

    #[test]
    fn request_appends_credentials_when_configured() {
        let request = client(Some("id-123"), Some("secret-456"))
            .repos_request("octocat")
            .build()
            .unwrap();

        let query: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("client_id".into(), "id-123".into())));
        assert!(query.contains(&("client_secret".into(), "secret-456".into())));
    }
}
