//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    SearchMovieParams, TmdbErrorResponse, TmdbGenreListResponse, TmdbMovieDetails, TmdbMoviePage,
    TmdbVideoList, TopRatedParams,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// How a request authenticates against TMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Credentials {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token, sent as a bearer token.
    Bearer(String),
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request credentials.
    credentials: Credentials,
    /// Response language sent with every request.
    language: Option<String>,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_token: None,
            user_agent: None,
            language: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key (sent as `api_key` query parameter).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the v4 read access token (sent as `Authorization: Bearer`).
    ///
    /// Takes precedence over an API key when both are set.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "en-US", "pt-BR").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - Neither `api_key` nor `api_token` is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credentials = match (self.api_token, self.api_key) {
            (Some(token), _) => Credentials::Bearer(token),
            (None, Some(key)) => Credentials::ApiKey(key),
            (None, None) => bail!("api_key or api_token is required"),
        };
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credentials,
            language: self.language,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Builds the full query string for a request: credentials and
    /// language first, then the endpoint's own parameters.
    fn request_query(&self, params: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(params.len().saturating_add(2));
        if let Credentials::ApiKey(ref key) = self.credentials {
            query.push(("api_key", key.clone()));
        }
        if let Some(ref language) = self.language {
            query.push(("language", language.clone()));
        }
        query.extend(params.iter().cloned());
        query
    }

    /// Sends a GET request with credentials, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        let query = self.request_query(params);

        let mut retries = 0u32;
        loop {
            let mut builder = self.http_client.get(url.clone()).query(&query);
            if let Credentials::Bearer(ref token) = self.credentials {
                builder = builder.bearer_auth(token);
            }
            let request = builder
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(path, "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn genre_movie_list(&self) -> Result<TmdbGenreListResponse> {
        self.get_json("genre/movie/list", &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_top_rated(&self, params: &TopRatedParams) -> Result<TmdbMoviePage> {
        let mut query: Vec<(&str, String)> = vec![("page", params.page.to_string())];
        if let Some(genre_id) = params.with_genres {
            query.push(("with_genres", genre_id.to_string()));
        }

        self.get_json("movie/top_rated", &query).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbMoviePage> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(genre_id) = params.with_genres {
            query.push(("with_genres", genre_id.to_string()));
        }

        self.get_json("search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn movie_videos(&self, movie_id: u64) -> Result<TmdbVideoList> {
        let path = format!("movie/{movie_id}/videos");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path, &[]).await
    }
}
