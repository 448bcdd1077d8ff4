use crate::{Team, TeamData};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const TEAMS_PATH: &str = "/api/teams";

/// Client for a `team-server` metadata endpoint.
#[derive(Debug, Clone)]
pub struct TeamsApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Rejected(String, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Rejected(msg, url) => write!(f, "Rejected by {url}: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::Rejected(..) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl TeamsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("bracket-viz/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn teams_url(&self) -> String {
        format!("{}{TEAMS_PATH}", self.base_url)
    }

    /// Current metadata snapshot. An endpoint that has never been written to
    /// answers with an empty list.
    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        let url = self.teams_url();
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let data = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.clone()))?
            .json::<TeamData>()
            .await
            .map_err(|e| ApiError::Parsing(e, url))?;
        Ok(data.teams)
    }

    /// Replace the endpoint's snapshot with `teams`.
    pub async fn save_teams(&self, teams: &[Team]) -> ApiResult<()> {
        let url = self.teams_url();
        let body = TeamData { teams: teams.to_vec() };
        let response = self
            .client
            .put(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body = response
                .json::<ErrorBody>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.clone()))?;
            return Err(ApiError::Rejected(body.error, url));
        }
        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Region;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn fetch_teams_reads_snapshot() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"teams":[{"region":"East","seed":3,"name":"Wisconsin"},{"region":"South","seed":16}]}"#)
            .create_async()
            .await;

        let api = TeamsApi::new(server.url());
        let teams = api.fetch_teams().await.unwrap();
        mock.assert_async().await;

        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].region, Region::East);
        assert_eq!(teams[0].display_name(), "Wisconsin");
        assert!(teams[1].name.is_none());
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/teams")
            .with_status(200)
            .with_body(r#"{"teams":[]}"#)
            .create_async()
            .await;

        let api = TeamsApi::new(format!("{}/", server.url()));
        assert!(api.fetch_teams().await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn save_teams_puts_full_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/teams")
            .match_body(Matcher::Json(json!({
                "teams": [{"region": "Midwest", "seed": 1, "name": "Houston"}]
            })))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let mut houston = Team::new(Region::Midwest, 1);
        houston.name = Some("Houston".into());
        TeamsApi::new(server.url()).save_teams(&[houston]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bad_request_surfaces_server_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/teams")
            .with_status(400)
            .with_body(r#"{"error":"Invalid data format"}"#)
            .create_async()
            .await;

        let err = TeamsApi::new(server.url()).save_teams(&[]).await.unwrap_err();
        match err {
            ApiError::Rejected(msg, _) => assert_eq!(msg, "Invalid data format"),
            other => panic!("expected rejection, got {other}"),
        }
    }

    #[tokio::test]
    async fn server_errors_map_to_api_error() {
        let mut server = Server::new_async().await;
        let _get = server.mock("GET", "/api/teams").with_status(503).create_async().await;
        let _put = server
            .mock("PUT", "/api/teams")
            .with_status(500)
            .with_body(r#"{"error":"Failed to update team data"}"#)
            .create_async()
            .await;

        let api = TeamsApi::new(server.url());
        assert!(matches!(api.fetch_teams().await, Err(ApiError::Api(..))));
        assert!(matches!(api.save_teams(&[]).await, Err(ApiError::Api(..))));
    }

    #[tokio::test]
    async fn garbage_body_is_a_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = TeamsApi::new(server.url()).fetch_teams().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "{err}");
    }
}
