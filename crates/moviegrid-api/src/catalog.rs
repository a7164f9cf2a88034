//! Movie catalog: the operations a movie browser needs, on top of a TMDB API.
//!
//! `Catalog` reshapes TMDB responses into plain records and keeps the
//! genre id → name lookup for the whole session. The lookup is either
//! empty (never fetched, or the fetch failed) or complete; a failed fetch
//! is not remembered, so the next call tries again.
#![allow(clippy::future_not_send)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::tmdb::{
    LocalTmdbApi, SearchMovieParams, TmdbGenre, TmdbMovie, TmdbMovieDetails, TmdbVideo,
    TopRatedParams,
};

/// Query that selects the top-rated list instead of a title search.
pub const TOP_RATED_QUERY: &str = "best";

/// Number of movies kept from the first result page by default.
pub const DEFAULT_DISPLAY_LIMIT: usize = 16;

/// Video type accepted as a trailer.
const TRAILER_KIND: &str = "Trailer";

/// Platform trailers must be hosted on.
const TRAILER_SITE: &str = "YouTube";

/// Genre id → name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreMap(HashMap<u32, String>);

impl GenreMap {
    /// Returns the name for a genre id.
    #[must_use]
    pub fn name(&self, id: u32) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Number of known genres.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no genres are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(id, name)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl FromIterator<TmdbGenre> for GenreMap {
    fn from_iter<I: IntoIterator<Item = TmdbGenre>>(iter: I) -> Self {
        Self(iter.into_iter().map(|g| (g.id, g.name)).collect())
    }
}

impl FromIterator<(u32, String)> for GenreMap {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A movie as shown in the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster path on the image CDN, if the movie has one.
    pub poster_path: Option<String>,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Genre IDs, resolved through a [`GenreMap`].
    pub genre_ids: Vec<u32>,
}

impl From<TmdbMovie> for Movie {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
            vote_average: movie.vote_average,
            genre_ids: movie.genre_ids,
        }
    }
}

/// Movies returned by one query, paired with the genre names to show them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Movies in API order.
    pub movies: Vec<Movie>,
    /// Genre lookup at the time of the query.
    pub genres: Arc<GenreMap>,
}

impl SearchResult {
    /// Whether the query matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Extra information about a single movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Number of votes.
    pub vote_count: u32,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Genre names.
    pub genres: Vec<String>,
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(details: TmdbMovieDetails) -> Self {
        Self {
            id: details.id,
            title: details.title,
            release_date: details.release_date.filter(|d| !d.is_empty()),
            overview: details.overview.filter(|o| !o.is_empty()),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            runtime: details.runtime,
            genres: details.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

/// Returns `true` if `query` selects the top-rated list.
#[must_use]
pub fn is_top_rated_query(query: &str) -> bool {
    query.trim().eq_ignore_ascii_case(TOP_RATED_QUERY)
}

/// Returns the key of the first YouTube trailer in `videos`.
#[must_use]
pub fn first_trailer_key(videos: &[TmdbVideo]) -> Option<&str> {
    videos
        .iter()
        .find(|v| v.kind == TRAILER_KIND && v.site == TRAILER_SITE)
        .map(|v| v.key.as_str())
}

/// Session-scoped movie catalog.
#[derive(Debug)]
pub struct Catalog<A> {
    /// Underlying TMDB API.
    api: A,
    /// Genre lookup, set once after the first successful fetch.
    genres: OnceCell<Arc<GenreMap>>,
    /// Maximum number of movies kept per result (`None` = whole page).
    display_limit: Option<usize>,
}

impl<A: LocalTmdbApi> Catalog<A> {
    /// Creates a catalog with the default display limit.
    pub fn new(api: A) -> Self {
        Self {
            api,
            genres: OnceCell::new(),
            display_limit: Some(DEFAULT_DISPLAY_LIMIT),
        }
    }

    /// Sets how many movies of the first page are kept; `0` keeps them all.
    #[must_use]
    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = (limit > 0).then_some(limit);
        self
    }

    /// Returns the underlying API.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns the genre lookup, fetching it on first use.
    ///
    /// Never fails: when the genre list cannot be fetched the failure is
    /// logged and an empty lookup is returned, so movies still display.
    pub async fn fetch_genres(&self) -> Arc<GenreMap> {
        let result = self
            .genres
            .get_or_try_init(|| async {
                let response = self.api.genre_movie_list().await?;
                anyhow::Ok(Arc::new(response.genres.into_iter().collect::<GenreMap>()))
            })
            .await;

        match result {
            Ok(genres) => Arc::clone(genres),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load genres");
                Arc::new(GenreMap::default())
            }
        }
    }

    /// Fetches the movies for a query.
    ///
    /// `"best"` (any case) lists top-rated movies; anything else is a title
    /// search. `genre` is forwarded as the `with_genres` filter. Only the
    /// first page is fetched, truncated to the display limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the movie request or JSON parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_movies(&self, query: &str, genre: Option<u32>) -> Result<SearchResult> {
        let page = if is_top_rated_query(query) {
            let mut params = TopRatedParams::default();
            if let Some(genre_id) = genre {
                params = params.with_genres(genre_id);
            }
            self.api
                .movie_top_rated(&params)
                .await
                .context("failed to fetch top rated movies")?
        } else {
            let mut params = SearchMovieParams::new(query);
            if let Some(genre_id) = genre {
                params = params.with_genres(genre_id);
            }
            self.api
                .search_movie(&params)
                .await
                .context("failed to search movies")?
        };

        let genres = self.fetch_genres().await;
        let limit = self.display_limit.unwrap_or(usize::MAX);
        let movies: Vec<Movie> = page
            .results
            .into_iter()
            .take(limit)
            .map(Movie::from)
            .collect();

        tracing::debug!(
            count = movies.len(),
            total_results = page.total_results,
            "movies fetched"
        );

        Ok(SearchResult { movies, genres })
    }

    /// Returns the YouTube key of the movie's first trailer, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the video request or JSON parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_trailer_key(&self, movie_id: u64) -> Result<Option<String>> {
        let videos = self
            .api
            .movie_videos(movie_id)
            .await
            .with_context(|| format!("failed to fetch videos for movie {movie_id}"))?;

        let key = first_trailer_key(&videos.results).map(String::from);
        if key.is_none() {
            tracing::info!(movie_id, "no official trailer found");
        }
        Ok(key)
    }

    /// Fetches details (vote count, runtime, ...) for a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the details request or JSON parsing fails.
    #[instrument(skip(self))]
    pub async fn fetch_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let details = self
            .api
            .movie_details(movie_id)
            .await
            .with_context(|| format!("failed to fetch details for movie {movie_id}"))?;
        Ok(details.into())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::float_cmp)]

    use std::cell::Cell;
    use std::time::Duration;

    use anyhow::bail;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::tmdb::{
        TmdbClient, TmdbGenreListResponse, TmdbMovieDetails, TmdbMoviePage, TmdbVideoList,
    };

    /// In-memory API that counts calls per endpoint.
    #[derive(Default)]
    struct FakeApi {
        fail_genres: Cell<bool>,
        genre_calls: Cell<u32>,
        top_rated_calls: Cell<u32>,
        search_calls: Cell<u32>,
        last_search: std::cell::RefCell<Option<SearchMovieParams>>,
    }

    impl FakeApi {
        fn bump(cell: &Cell<u32>) {
            cell.set(cell.get().saturating_add(1));
        }
    }

    impl LocalTmdbApi for FakeApi {
        async fn genre_movie_list(&self) -> Result<TmdbGenreListResponse> {
            Self::bump(&self.genre_calls);
            if self.fail_genres.get() {
                bail!("genre endpoint unavailable");
            }
            Ok(serde_json::from_str(include_str!(
                "../../../fixtures/tmdb/genre_movie_list.json"
            ))?)
        }

        async fn movie_top_rated(&self, _params: &TopRatedParams) -> Result<TmdbMoviePage> {
            Self::bump(&self.top_rated_calls);
            Ok(serde_json::from_str(include_str!(
                "../../../fixtures/tmdb/movie_top_rated.json"
            ))?)
        }

        async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbMoviePage> {
            Self::bump(&self.search_calls);
            *self.last_search.borrow_mut() = Some(params.clone());
            Ok(serde_json::from_str(include_str!(
                "../../../fixtures/tmdb/search_movie_thor.json"
            ))?)
        }

        async fn movie_videos(&self, movie_id: u64) -> Result<TmdbVideoList> {
            if movie_id == 10_195 {
                Ok(serde_json::from_str(include_str!(
                    "../../../fixtures/tmdb/movie_videos_10195.json"
                ))?)
            } else {
                Ok(serde_json::from_str(include_str!(
                    "../../../fixtures/tmdb/movie_videos_no_trailer.json"
                ))?)
            }
        }

        async fn movie_details(&self, _movie_id: u64) -> Result<TmdbMovieDetails> {
            Ok(serde_json::from_str(include_str!(
                "../../../fixtures/tmdb/movie_details_10195.json"
            ))?)
        }
    }

    #[test]
    fn test_is_top_rated_query() {
        assert!(is_top_rated_query("best"));
        assert!(is_top_rated_query("BEST"));
        assert!(is_top_rated_query("  Best "));
        assert!(!is_top_rated_query("best of"));
        assert!(!is_top_rated_query("bestseller"));
        assert!(!is_top_rated_query(""));
    }

    #[tokio::test]
    async fn test_fetch_genres_is_cached() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default());

        // Act
        let first = catalog.fetch_genres().await;
        let second = catalog.fetch_genres().await;

        // Assert
        assert_eq!(catalog.api().genre_calls.get(), 1);
        assert_eq!(first.len(), 19);
        assert_eq!(first.name(878), Some("Science Fiction"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_fetch_genres_failure_is_empty_and_retried() {
        // Arrange
        let api = FakeApi::default();
        api.fail_genres.set(true);
        let catalog = Catalog::new(api);

        // Act
        let failed = catalog.fetch_genres().await;
        catalog.api().fail_genres.set(false);
        let recovered = catalog.fetch_genres().await;

        // Assert
        assert!(failed.is_empty());
        assert_eq!(recovered.len(), 19);
        assert_eq!(catalog.api().genre_calls.get(), 2);
    }

    #[test]
    fn test_fetch_genres_failure_logs_warning() {
        // Arrange
        let api = FakeApi::default();
        api.fail_genres.set(true);
        let catalog = Catalog::new(api);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            runtime.block_on(catalog.fetch_genres());
        });

        // Assert
        handle.assert_finished();
    }

    #[tokio::test]
    async fn test_fetch_movies_best_uses_top_rated() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default());

        // Act
        let result = catalog.fetch_movies("BeSt", None).await.unwrap();

        // Assert
        assert_eq!(catalog.api().top_rated_calls.get(), 1);
        assert_eq!(catalog.api().search_calls.get(), 0);
        assert_eq!(result.movies[0].title, "The Shawshank Redemption");
        assert_eq!(result.genres.name(80), Some("Crime"));
    }

    #[tokio::test]
    async fn test_fetch_movies_search_forwards_query_and_genre() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default());

        // Act
        let result = catalog.fetch_movies("thor", Some(28)).await.unwrap();

        // Assert
        assert_eq!(catalog.api().search_calls.get(), 1);
        assert_eq!(catalog.api().top_rated_calls.get(), 0);
        let params = catalog.api().last_search.borrow().clone().unwrap();
        assert_eq!(params.query, "thor");
        assert_eq!(params.with_genres, Some(28));
        assert_eq!(result.movies.len(), 5);
        assert!(result.movies[4].poster_path.is_none());
    }

    #[tokio::test]
    async fn test_fetch_movies_applies_display_limit() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default()).with_display_limit(2);

        // Act
        let result = catalog.fetch_movies("thor", None).await.unwrap();

        // Assert
        assert_eq!(result.movies.len(), 2);
        assert_eq!(result.movies[1].id, 284_053);
    }

    #[tokio::test]
    async fn test_fetch_movies_zero_limit_keeps_page() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default()).with_display_limit(0);

        // Act
        let result = catalog.fetch_movies("thor", None).await.unwrap();

        // Assert
        assert_eq!(result.movies.len(), 5);
    }

    #[tokio::test]
    async fn test_fetch_movies_survives_genre_failure() {
        // Arrange
        let api = FakeApi::default();
        api.fail_genres.set(true);
        let catalog = Catalog::new(api);

        // Act
        let result = catalog.fetch_movies("thor", None).await.unwrap();

        // Assert
        assert_eq!(result.movies.len(), 5);
        assert!(result.genres.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_trailer_key_picks_first_youtube_trailer() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default());

        // Act
        let key = catalog.fetch_trailer_key(10_195).await.unwrap();

        // Assert
        assert_eq!(key.as_deref(), Some("JOddp-nlNvQ"));
    }

    #[tokio::test]
    async fn test_fetch_trailer_key_none_without_trailer() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default());

        // Act
        let key = catalog.fetch_trailer_key(1_003_581).await.unwrap();

        // Assert
        assert!(key.is_none());
    }

    #[tokio::test]
    async fn test_fetch_details_reshapes_record() {
        // Arrange
        let catalog = Catalog::new(FakeApi::default());

        // Act
        let details = catalog.fetch_details(10_195).await.unwrap();

        // Assert
        assert_eq!(details.vote_count, 21_345);
        assert_eq!(details.runtime, Some(115));
        assert_eq!(details.genres, vec!["Adventure", "Fantasy", "Action"]);
        assert_eq!(details.vote_average, 6.771);
    }

    #[tokio::test]
    async fn test_best_never_hits_search_endpoint_over_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/top_rated"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/tmdb/movie_top_rated.json"
            )))
            .expect(1)
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/tmdb/search_movie_empty.json"
            )))
            .expect(0)
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/genre/movie/list"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/tmdb/genre_movie_list.json"
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();
        let catalog = Catalog::new(client);

        // Act
        let result = catalog.fetch_movies("Best", None).await.unwrap();

        // Assert (mock expectations verified on drop)
        assert_eq!(result.movies.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_movies_network_error_is_returned() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();
        let catalog = Catalog::new(client);

        // Act
        let result = catalog.fetch_movies("thor", None).await;

        // Assert
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("failed to search movies"));
        assert!(err.contains("HTTP 500"));
    }
}
