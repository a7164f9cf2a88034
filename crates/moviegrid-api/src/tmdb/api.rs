//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    SearchMovieParams, TmdbGenreListResponse, TmdbMovieDetails, TmdbMoviePage, TmdbVideoList,
    TopRatedParams,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the official movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genre_movie_list(&self) -> Result<TmdbGenreListResponse>;

    /// Fetches the top-rated movie list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_top_rated(&self, params: &TopRatedParams) -> Result<TmdbMoviePage>;

    /// Searches for movies by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbMoviePage>;

    /// Fetches the videos (trailers, teasers, ...) attached to a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_videos(&self, movie_id: u64) -> Result<TmdbVideoList>;

    /// Fetches full details for a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<TmdbMovieDetails>;
}
