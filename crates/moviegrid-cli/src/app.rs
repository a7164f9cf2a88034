//! Interactive session: wires the catalog, cache, view, and debounce timer.
//!
//! `App` owns every piece of session state. The terminal loop feeds it
//! keystrokes and ticks and awaits the searches and card actions it hands
//! back; nothing here touches the terminal.
#![allow(clippy::future_not_send)]

use std::time::{Duration, Instant};

use moviegrid_api::catalog::{Catalog, TOP_RATED_QUERY};
use moviegrid_api::links;
use moviegrid_api::tmdb::LocalTmdbApi;
use tracing::instrument;

use crate::browser::Browser;
use crate::cache::{CacheKey, SearchCache};
use crate::debounce::Debouncer;
use crate::view::{CardAction, View};

/// Shown when a search is submitted with blank input.
pub const MSG_EMPTY_QUERY: &str = "Please type something to search";
/// Shown when a query matched nothing.
pub const MSG_NO_MOVIES: &str = "No movies found";
/// Shown when the movie request failed.
pub const MSG_FETCH_FAILED: &str = "Failed to fetch movies";
/// Shown when a movie has no YouTube trailer.
pub const MSG_NO_TRAILER: &str = "Trailer not found!";
/// Shown when the trailer lookup failed.
pub const MSG_TRAILER_FAILED: &str = "Failed to fetch trailer";
/// Shown when the system browser could not be launched.
pub const MSG_BROWSER_FAILED: &str = "Failed to open browser";

/// Tunables taken from the config file.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// Quiet period before a live search fires.
    pub debounce: Duration,
    /// Minimum trimmed length for a live search.
    pub min_query_len: usize,
    /// Lifetime of error notices.
    pub error_timeout: Duration,
}

/// Whether a search is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Waiting for input.
    Idle,
    /// A search has been accepted and not yet settled.
    Searching,
}

/// A validated search waiting to be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    key: CacheKey,
}

impl SearchRequest {
    /// Cache key of the search.
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }
}

/// The interactive movie browser.
#[derive(Debug)]
pub struct App<A, B> {
    catalog: Catalog<A>,
    browser: B,
    cache: SearchCache,
    view: View,
    debouncer: Debouncer,
    state: SearchState,
    /// Text in the search box.
    input: String,
    /// Genre filter applied to every search.
    genre_filter: Option<u32>,
}

impl<A: LocalTmdbApi, B: Browser> App<A, B> {
    /// Creates an idle session with an empty grid.
    pub fn new(catalog: Catalog<A>, browser: B, settings: Settings) -> Self {
        Self {
            catalog,
            browser,
            cache: SearchCache::default(),
            view: View::new(settings.error_timeout),
            debouncer: Debouncer::new(settings.debounce, settings.min_query_len),
            state: SearchState::Idle,
            input: String::new(),
            genre_filter: None,
        }
    }

    /// Restricts every following search to one genre.
    #[must_use]
    pub fn with_genre_filter(mut self, genre: Option<u32>) -> Self {
        self.genre_filter = genre;
        self
    }

    /// The movie grid.
    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// The movie grid, mutably (selection changes).
    pub const fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Session search cache.
    #[must_use]
    pub const fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Current search state.
    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// Text in the search box.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether typed input is waiting to fire a live search.
    #[must_use]
    pub const fn live_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Genre filter in effect.
    #[must_use]
    pub const fn genre_filter(&self) -> Option<u32> {
        self.genre_filter
    }

    /// Starts loading the top-rated list shown on launch.
    pub fn startup(&mut self) -> Option<SearchRequest> {
        self.begin_search(TOP_RATED_QUERY)
    }

    /// Validates `input` and enters [`SearchState::Searching`].
    ///
    /// Blank input shows a notice and yields `None`. An accepted search
    /// supersedes any pending live search.
    pub fn begin_search(&mut self, input: &str) -> Option<SearchRequest> {
        let query = input.trim();
        if query.is_empty() {
            self.view.show_error(MSG_EMPTY_QUERY, Instant::now());
            return None;
        }
        self.debouncer.cancel();
        self.state = SearchState::Searching;
        self.view.show_loading(true);
        Some(SearchRequest {
            key: CacheKey::new(query, self.genre_filter),
        })
    }

    /// Loads and renders a search accepted by [`Self::begin_search`].
    ///
    /// Cached results render without a request. Empty results are shown
    /// as a notice and never cached. Failures become a notice as well; the
    /// session keeps running either way.
    #[instrument(skip_all, fields(key = %request.key))]
    pub async fn finish_search(&mut self, request: SearchRequest) {
        let SearchRequest { key } = request;

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("cache hit");
            self.view.render(cached);
        } else {
            match self.catalog.fetch_movies(&key.query, key.genre).await {
                Ok(result) if result.is_empty() => {
                    self.view.show_error(MSG_NO_MOVIES, Instant::now());
                }
                Ok(result) => {
                    self.view.render(&result);
                    self.cache.set(key, result);
                }
                Err(e) => {
                    tracing::warn!(error = %format_args!("{e:#}"), "search failed");
                    self.view.show_error(MSG_FETCH_FAILED, Instant::now());
                }
            }
        }

        self.view.show_loading(false);
        self.state = SearchState::Idle;
    }

    /// Replaces the search box text and restarts the live-search timer.
    pub fn input_changed(&mut self, text: &str, now: Instant) {
        text.clone_into(&mut self.input);
        self.debouncer.input(text, now);
    }

    /// Advances timers: drops expired notices and returns the live search
    /// to run, if the debounce delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<SearchRequest> {
        self.view.expire_notices(now);
        let text = self.debouncer.poll(now)?;
        self.begin_search(&text)
    }

    /// Runs a card action.
    #[instrument(skip(self))]
    pub async fn activate(&mut self, action: CardAction) {
        match action {
            CardAction::OpenPoster(movie_id) | CardAction::OpenDetails(movie_id) => {
                self.open_url(&links::movie_page_url(movie_id));
            }
            CardAction::OpenTrailer(movie_id) => {
                match self.catalog.fetch_trailer_key(movie_id).await {
                    Ok(Some(key)) => self.open_url(&links::trailer_url(&key)),
                    Ok(None) => self.view.show_error(MSG_NO_TRAILER, Instant::now()),
                    Err(e) => {
                        tracing::warn!(error = %format_args!("{e:#}"), "trailer lookup failed");
                        self.view.show_error(MSG_TRAILER_FAILED, Instant::now());
                    }
                }
            }
        }
    }

    /// Opens `url`, turning a failure into a notice.
    fn open_url(&mut self, url: &str) {
        if let Err(e) = self.browser.open(url) {
            tracing::warn!(error = %format_args!("{e:#}"), url, "failed to open browser");
            self.view.show_error(MSG_BROWSER_FAILED, Instant::now());
        }
    }
}
