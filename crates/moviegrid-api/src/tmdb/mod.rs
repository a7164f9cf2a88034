//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints: genre list,
//! top-rated list, title search, videos and details.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    SearchMovieParams, TmdbErrorResponse, TmdbGenre, TmdbGenreListResponse, TmdbMovie,
    TmdbMovieDetails, TmdbMoviePage, TmdbVideo, TmdbVideoList, TopRatedParams,
};
