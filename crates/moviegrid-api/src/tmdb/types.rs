//! TMDB API response types and request parameters.

use serde::Deserialize;

// --- Genres ---

/// Response from `genre/movie/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreListResponse {
    /// All movie genres known to TMDB.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Movie lists (search/movie, movie/top_rated) ---

/// A page of movies, as returned by `search/movie` and `movie/top_rated`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMoviePage {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<TmdbMovie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie list entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD or empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Poster image path, relative to the image CDN.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

// --- Videos ---

/// Response from `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    /// Movie ID the videos belong to.
    #[serde(default)]
    pub id: Option<u64>,
    /// Videos (trailers, teasers, clips, ...).
    pub results: Vec<TmdbVideo>,
}

/// A single video attached to a movie.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    /// Video name.
    #[serde(default)]
    pub name: String,
    /// Platform-specific video key (the YouTube video ID for `site == "YouTube"`).
    pub key: String,
    /// Hosting platform (e.g., "YouTube", "Vimeo").
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser", "Clip").
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the video is marked official.
    #[serde(default)]
    pub official: Option<bool>,
}

// --- Movie details ---

/// Response from `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Genre filter, sent as `with_genres`.
    pub with_genres: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            with_genres: None,
            include_adult: false,
        }
    }

    /// Sets the genre filter.
    #[must_use]
    pub const fn with_genres(mut self, genre_id: u32) -> Self {
        self.with_genres = Some(genre_id);
        self
    }
}

/// Parameters for `movie/top_rated` endpoint.
#[derive(Debug, Clone)]
pub struct TopRatedParams {
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Genre filter, sent as `with_genres`.
    pub with_genres: Option<u32>,
}

impl Default for TopRatedParams {
    fn default() -> Self {
        Self {
            page: 1,
            with_genres: None,
        }
    }
}

impl TopRatedParams {
    /// Sets the genre filter.
    #[must_use]
    pub const fn with_genres(mut self, genre_id: u32) -> Self {
        self.with_genres = Some(genre_id);
        self
    }
}
