//! External URLs a movie card links to.

/// Image CDN prefix for `w500` posters.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Poster shown when a movie has no poster or its image fails to load.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// TMDB website (not the API).
pub const TMDB_SITE_URL: &str = "https://www.themoviedb.org";

/// YouTube watch page prefix.
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Returns the CDN URL for a poster path (e.g. `/abc.jpg`).
#[must_use]
pub fn poster_url(poster_path: &str) -> String {
    format!("{POSTER_BASE_URL}{poster_path}")
}

/// Returns the TMDB page for a movie.
#[must_use]
pub fn movie_page_url(movie_id: u64) -> String {
    format!("{TMDB_SITE_URL}/movie/{movie_id}")
}

/// Returns the YouTube watch page for a video key.
#[must_use]
pub fn trailer_url(video_key: &str) -> String {
    format!("{YOUTUBE_WATCH_URL}{video_key}")
}
