//! API client library for moviegrid.
//!
//! Provides the TMDB API client, the session-scoped movie catalog built on
//! top of it, and builders for the external pages a movie links to.

/// Movie catalog: search, genres and trailers with a session genre cache.
pub mod catalog;

/// External URLs (poster CDN, TMDB pages, YouTube).
pub mod links;

/// TMDB API client.
pub mod tmdb;
