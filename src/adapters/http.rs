use crate::domain::model::{Answer, Breed, Dog, Page};
use crate::domain::ports::DogApi;
use crate::utils::error::{DogHouseError, Result, DEFAULT_REQUEST_ERROR};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const API_PREFIX: &str = "/api/v1";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// HTTP client for the dogs API.
///
/// Every call is awaited on its own; the client never has two requests in
/// flight. Failures of any kind (connection, status, body) surface as
/// [`DogHouseError::Request`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        crate::utils::validation::validate_url("base_url", base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| DogHouseError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/api/v1{path}`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}{}", self.base_url, API_PREFIX, path);
        Url::parse(&raw).map_err(|e| DogHouseError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: raw,
            reason: format!("Invalid URL format: {}", e),
        })
    }

    pub async fn get(&self, url: Url, token: &str) -> Result<serde_json::Value> {
        if token.is_empty() {
            return Err(DogHouseError::MissingToken);
        }
        self.request(Method::GET, url, None, Some(token), None).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: Url,
        data: &T,
        token: &str,
    ) -> Result<serde_json::Value> {
        if token.is_empty() {
            return Err(DogHouseError::MissingToken);
        }
        let body = serde_json::to_value(data)?;
        self.request(Method::POST, url, Some(body), Some(token), None)
            .await
    }

    /// Unauthenticated login; the reply carries the token.
    pub async fn auth(&self, email: &str, password: &str) -> Result<serde_json::Value> {
        let body = serde_json::to_value(Credentials { email, password })?;
        self.request(
            Method::POST,
            self.endpoint("/auth/")?,
            Some(body),
            None,
            Some(INVALID_CREDENTIALS),
        )
        .await
    }

    async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
        token: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<serde_json::Value> {
        let error_message = error_message.unwrap_or(DEFAULT_REQUEST_ERROR);

        tracing::debug!("Making API request: {} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        // 有 token 才加授權標頭
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.header(reqwest::header::AUTHORIZATION, format!("JWT {}", token));
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DogHouseError::request_with_source(error_message, e))?;

        tracing::debug!("API response status: {}", response.status());

        response
            .error_for_status()
            .map_err(|e| DogHouseError::request_with_source(error_message, e))?
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DogHouseError::request_with_source(error_message, e))
    }

    /// Reads every page of a list endpoint, following `next` links.
    ///
    /// A `next` on another origin or one already visited ends the read with
    /// a request error; the token only goes to the API's own host.
    async fn get_all<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<Vec<T>> {
        let first = self.endpoint(path)?;
        let origin = first.origin();
        let mut visited: HashSet<Url> = HashSet::new();
        let mut results = Vec::new();
        let mut next = Some(first);

        while let Some(url) = next.take() {
            visited.insert(url.clone());

            let value = self.get(url, token).await?;
            let page: Page<T> = serde_json::from_value(value)
                .map_err(|e| DogHouseError::request_with_source(DEFAULT_REQUEST_ERROR, e))?;

            results.extend(page.results);

            if let Some(link) = page.next {
                tracing::debug!("Following next page: {}", link);
                let url = Url::parse(&link)
                    .map_err(|e| DogHouseError::request_with_source(DEFAULT_REQUEST_ERROR, e))?;

                if url.origin() != origin {
                    tracing::warn!("⚠️ Refusing next page on another host: {}", url);
                    return Err(DogHouseError::request(DEFAULT_REQUEST_ERROR));
                }
                if visited.contains(&url) {
                    tracing::warn!("⚠️ Pagination loops back to {}", url);
                    return Err(DogHouseError::request(DEFAULT_REQUEST_ERROR));
                }
                next = Some(url);
            }
        }

        Ok(results)
    }
}

#[async_trait]
impl DogApi for ApiClient {
    async fn fetch_breeds(&self, token: &str) -> Result<Vec<Breed>> {
        self.get_all("/breeds/", token).await
    }

    async fn fetch_dogs(&self, token: &str) -> Result<Vec<Dog>> {
        self.get_all("/dogs/", token).await
    }

    async fn send_answer(&self, answer: &Answer, token: &str) -> Result<serde_json::Value> {
        self.post(self.endpoint("/answer/")?, answer, token).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let value = self.auth(email, password).await?;
        let reply: AuthResponse = serde_json::from_value(value)
            .map_err(|e| DogHouseError::request_with_source(INVALID_CREDENTIALS, e))?;
        Ok(reply.token)
    }
}
