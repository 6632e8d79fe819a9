// GitHub API HTTP client.
// Handles optional authentication, Accept negotiation, and status checking.

use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Result, ScopeError};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Accept header value for JSON API responses.
pub const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
/// Accept header value for raw blob/README content.
pub const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";

/// GitHub API client. The token is optional: without one, requests fall
/// under GitHub's unauthenticated rate limits but still succeed.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// Create a new client, attaching the token as a bearer credential
    /// when one is given.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ScopeError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("reposcope-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ScopeError::Api)?;

        Ok(Self {
            client,
            api_base: GITHUB_API_BASE.to_string(),
        })
    }

    /// Create a client from the GITHUB_TOKEN environment variable.
    /// A missing variable is not an error.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").ok();
        Self::new(token.as_deref())
    }

    /// Make a GET request to an API endpoint with the given Accept value.
    pub async fn get(&self, endpoint: &str, accept: &'static str) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        self.get_url(&url, accept).await
    }

    /// Make a GET request to an API endpoint with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        accept: &'static str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, accept)
            .query(params)
            .send()
            .await
            .map_err(ScopeError::Api)?;

        check_response(response)
    }

    /// Make a GET request to an absolute URL (raw content hosts).
    pub async fn get_url(&self, url: &str, accept: &'static str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(ScopeError::Api)?;

        check_response(response)
    }
}

/// Surface any non-success status as an explicit failure carrying the code.
fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ScopeError::Status {
            code: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}
