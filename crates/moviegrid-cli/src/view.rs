//! Card view model for the movie grid.
//!
//! Holds what the terminal draws: one card per movie, the selected card,
//! and the status line (loading indicator and transient notices). Drawing
//! itself lives in [`crate::tui`].

use std::time::{Duration, Instant};

use moviegrid_api::catalog::{GenreMap, Movie, SearchResult};
use moviegrid_api::links;

/// Number of movies kept per genre by [`group_by_genre`] by default.
pub const DEFAULT_PER_GENRE: usize = 10;

/// Poster image shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Image on the TMDB CDN.
    Remote(String),
    /// "No Poster" placeholder.
    Placeholder,
}

impl Poster {
    /// Returns the image URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Remote(url) => url.as_str(),
            Self::Placeholder => links::PLACEHOLDER_POSTER_URL,
        }
    }
}

/// Something the user can trigger on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Poster clicked: open the movie page.
    OpenPoster(u64),
    /// Details button: open the movie page.
    OpenDetails(u64),
    /// Trailer button: look up and open the trailer.
    OpenTrailer(u64),
}

/// One rendered movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    /// TMDB movie ID the card's actions refer to.
    pub movie_id: u64,
    /// Title.
    pub title: String,
    /// Poster image.
    pub poster: Poster,
    /// Comma-joined genre names.
    pub genres: String,
    /// Rating with one decimal.
    pub rating: String,
}

impl MovieCard {
    /// Builds the card for `movie`, resolving genre names through `genres`.
    #[must_use]
    pub fn from_movie(movie: &Movie, genres: &GenreMap) -> Self {
        let poster = movie
            .poster_path
            .as_deref()
            .map_or(Poster::Placeholder, |path| {
                Poster::Remote(links::poster_url(path))
            });
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            poster,
            genres: genre_names(&movie.genre_ids, genres),
            rating: format_rating(movie.vote_average),
        }
    }

    /// Action bound to the poster.
    #[must_use]
    pub const fn poster_action(&self) -> CardAction {
        CardAction::OpenPoster(self.movie_id)
    }

    /// Action bound to the "Details" control.
    #[must_use]
    pub const fn details_action(&self) -> CardAction {
        CardAction::OpenDetails(self.movie_id)
    }

    /// Action bound to the "Trailer" control.
    #[must_use]
    pub const fn trailer_action(&self) -> CardAction {
        CardAction::OpenTrailer(self.movie_id)
    }
}

/// Joins genre names with ", ". Unknown ids become empty slots.
#[must_use]
pub fn genre_names(ids: &[u32], genres: &GenreMap) -> String {
    ids.iter()
        .map(|id| genres.name(*id).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a vote average with one decimal (e.g. `7.3`).
#[must_use]
pub fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

/// Transient message with an expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown on the status line.
    pub message: String,
    /// When the notice disappears.
    pub expires_at: Instant,
}

/// Loading indicator plus at most one notice.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Whether a request is in flight.
    pub loading: bool,
    /// Current notice.
    pub notice: Option<Notice>,
}

/// The movie grid.
#[derive(Debug, Clone)]
pub struct View {
    /// Cards in result order.
    cards: Vec<MovieCard>,
    /// Index of the selected card.
    selected: usize,
    /// Status line state.
    status: StatusLine,
    /// Default lifetime of error notices.
    error_timeout: Duration,
}

impl View {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(error_timeout: Duration) -> Self {
        Self {
            cards: Vec::new(),
            selected: 0,
            status: StatusLine::default(),
            error_timeout,
        }
    }

    /// Replaces the grid with one card per movie in `result`.
    pub fn render(&mut self, result: &SearchResult) {
        self.cards.clear();
        self.cards.extend(
            result
                .movies
                .iter()
                .map(|movie| MovieCard::from_movie(movie, &result.genres)),
        );
        self.selected = 0;
    }

    /// Rendered cards.
    #[must_use]
    pub fn cards(&self) -> &[MovieCard] {
        &self.cards
    }

    /// Index of the selected card.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selected card, if the grid is not empty.
    #[must_use]
    pub fn selected(&self) -> Option<&MovieCard> {
        self.cards.get(self.selected)
    }

    /// Moves the selection one card left.
    pub const fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the selection one card right.
    pub fn move_right(&mut self) {
        self.select(self.selected.saturating_add(1));
    }

    /// Moves the selection one row up in a grid of `columns` cards per row.
    pub fn move_up(&mut self, columns: usize) {
        if self.selected >= columns.max(1) {
            self.selected = self.selected.saturating_sub(columns.max(1));
        }
    }

    /// Moves the selection one row down in a grid of `columns` cards per row.
    pub fn move_down(&mut self, columns: usize) {
        let target = self.selected.saturating_add(columns.max(1));
        if target < self.cards.len() {
            self.selected = target;
        }
    }

    /// Selects `index` if it exists.
    fn select(&mut self, index: usize) {
        if index < self.cards.len() {
            self.selected = index;
        }
    }

    /// Shows or hides the loading indicator.
    pub const fn show_loading(&mut self, visible: bool) {
        self.status.loading = visible;
    }

    /// Whether the loading indicator is visible.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.status.loading
    }

    /// Shows `message` for the default error timeout.
    pub fn show_error(&mut self, message: &str, now: Instant) {
        self.show_error_for(message, self.error_timeout, now);
    }

    /// Shows `message` until `auto_hide` has elapsed.
    pub fn show_error_for(&mut self, message: &str, auto_hide: Duration, now: Instant) {
        self.status.notice = Some(Notice {
            message: String::from(message),
            expires_at: now.checked_add(auto_hide).unwrap_or(now),
        });
    }

    /// Current notice text, unless it has expired by `now`.
    #[must_use]
    pub fn notice(&self, now: Instant) -> Option<&str> {
        self.status
            .notice
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| n.message.as_str())
    }

    /// Drops the notice once it has expired.
    pub fn expire_notices(&mut self, now: Instant) {
        if self
            .status
            .notice
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.status.notice = None;
        }
    }
}

/// Groups movies under each genre name.
///
/// Groups appear in order of first occurrence; ids missing from the genre
/// lookup are skipped. Each group is sorted by rating (highest first) and
/// capped at `per_genre` movies.
#[must_use]
pub fn group_by_genre(result: &SearchResult, per_genre: usize) -> Vec<(String, Vec<Movie>)> {
    let mut groups: Vec<(String, Vec<Movie>)> = Vec::new();
    for movie in &result.movies {
        for id in &movie.genre_ids {
            let Some(name) = result.genres.name(*id) else {
                continue;
            };
            match groups.iter_mut().find(|(n, _)| n == name) {
                Some((_, movies)) => movies.push(movie.clone()),
                None => groups.push((String::from(name), vec![movie.clone()])),
            }
        }
    }
    for (_, movies) in &mut groups {
        sort_by_rating(movies);
        movies.truncate(per_genre);
    }
    groups
}

/// Sorts movies by rating, highest first. Ties keep their order.
pub fn sort_by_rating(movies: &mut [Movie]) {
    movies.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]

    use std::sync::Arc;

    use super::*;

    fn movie(id: u64, title: &str, rating: f64, genre_ids: Vec<u32>) -> Movie {
        Movie {
            id,
            title: String::from(title),
            poster_path: Some(format!("/{id}.jpg")),
            vote_average: rating,
            genre_ids,
        }
    }

    fn genres() -> GenreMap {
        [
            (28, String::from("Action")),
            (12, String::from("Adventure")),
            (14, String::from("Fantasy")),
            (18, String::from("Drama")),
        ]
        .into_iter()
        .collect()
    }

    fn sample_result() -> SearchResult {
        SearchResult {
            movies: vec![
                movie(10_195, "Thor", 6.771, vec![12, 14, 28]),
                movie(284_053, "Thor: Ragnarok", 7.6, vec![28, 12]),
                movie(1_003_581, "Thor: Unknown", 5.25, vec![28, 99_999]),
            ],
            genres: Arc::new(genres()),
        }
    }

    #[test]
    fn test_render_builds_cards() {
        // Arrange
        let mut view = View::new(Duration::from_secs(3));

        // Act
        view.render(&sample_result());

        // Assert
        let cards = view.cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "Thor");
        assert_eq!(cards[0].genres, "Adventure, Fantasy, Action");
        assert_eq!(cards[0].rating, "6.8");
        assert_eq!(
            cards[0].poster,
            Poster::Remote(String::from("https://image.tmdb.org/t/p/w500/10195.jpg"))
        );
    }

    #[test]
    fn test_render_is_idempotent_and_clears() {
        // Arrange
        let mut view = View::new(Duration::from_secs(3));
        let result = sample_result();

        // Act
        view.render(&result);
        let first = view.cards().to_vec();
        view.render(&result);

        // Assert
        assert_eq!(view.cards(), first.as_slice());
    }

    #[test]
    fn test_unknown_genre_renders_empty_slot() {
        // Arrange & Act
        let names = genre_names(&[28, 99_999], &genres());

        // Assert
        assert_eq!(names, "Action, ");
    }

    #[test]
    fn test_missing_poster_uses_placeholder() {
        // Arrange
        let mut m = movie(1, "No Poster", 5.0, vec![]);
        m.poster_path = None;

        // Act
        let card = MovieCard::from_movie(&m, &GenreMap::default());

        // Assert
        assert_eq!(card.poster, Poster::Placeholder);
        assert_eq!(
            card.poster.url(),
            "https://via.placeholder.com/500x750?text=No+Poster"
        );
        assert_eq!(card.genres, "");
    }

    #[test]
    fn test_card_actions_carry_movie_id() {
        // Arrange
        let card = MovieCard::from_movie(&movie(42, "A", 5.0, vec![]), &GenreMap::default());

        // Act & Assert
        assert_eq!(card.poster_action(), CardAction::OpenPoster(42));
        assert_eq!(card.details_action(), CardAction::OpenDetails(42));
        assert_eq!(card.trailer_action(), CardAction::OpenTrailer(42));
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(8.706), "8.7");
        assert_eq!(format_rating(0.0), "0.0");
        assert_eq!(format_rating(10.0), "10.0");
    }

    #[test]
    fn test_selection_moves_in_grid() {
        // Arrange: 3 cards, 2 per row
        let mut view = View::new(Duration::from_secs(3));
        view.render(&sample_result());

        // Act & Assert
        view.move_down(2);
        assert_eq!(view.selected_index(), 2);
        view.move_down(2);
        assert_eq!(view.selected_index(), 2);
        view.move_up(2);
        assert_eq!(view.selected_index(), 0);
        view.move_left();
        assert_eq!(view.selected_index(), 0);
        view.move_right();
        view.move_right();
        view.move_right();
        assert_eq!(view.selected_index(), 2);
        assert_eq!(view.selected().unwrap().movie_id, 1_003_581);
    }

    #[test]
    fn test_render_resets_selection() {
        // Arrange
        let mut view = View::new(Duration::from_secs(3));
        view.render(&sample_result());
        view.move_right();

        // Act
        view.render(&sample_result());

        // Assert
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn test_error_notice_expires() {
        // Arrange
        let mut view = View::new(Duration::from_millis(3000));
        let t0 = Instant::now();

        // Act
        view.show_error("No movies found", t0);

        // Assert
        assert_eq!(
            view.notice(t0 + Duration::from_millis(2999)),
            Some("No movies found")
        );
        assert!(view.notice(t0 + Duration::from_millis(3000)).is_none());
        view.expire_notices(t0 + Duration::from_millis(1000));
        assert!(view.notice(t0).is_some());
        view.expire_notices(t0 + Duration::from_millis(3000));
        assert!(view.notice(t0).is_none());
    }

    #[test]
    fn test_show_error_for_custom_duration() {
        // Arrange
        let mut view = View::new(Duration::from_millis(3000));
        let t0 = Instant::now();

        // Act
        view.show_error_for("Trailer not found!", Duration::from_millis(500), t0);

        // Assert
        assert!(view.notice(t0 + Duration::from_millis(499)).is_some());
        assert!(view.notice(t0 + Duration::from_millis(500)).is_none());
    }

    #[test]
    fn test_loading_toggle() {
        // Arrange
        let mut view = View::new(Duration::from_secs(3));

        // Act & Assert
        view.show_loading(true);
        assert!(view.is_loading());
        view.show_loading(false);
        assert!(!view.is_loading());
    }

    #[test]
    fn test_group_by_genre() {
        // Arrange
        let result = sample_result();

        // Act
        let groups = group_by_genre(&result, DEFAULT_PER_GENRE);

        // Assert: first-seen order, unknown id skipped, sorted by rating
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Adventure", "Fantasy", "Action"]);
        let action: Vec<u64> = groups[2].1.iter().map(|m| m.id).collect();
        assert_eq!(action, vec![284_053, 10_195, 1_003_581]);
    }

    #[test]
    fn test_group_by_genre_caps_each_group() {
        // Arrange
        let result = sample_result();

        // Act
        let groups = group_by_genre(&result, 1);

        // Assert
        assert!(groups.iter().all(|(_, movies)| movies.len() == 1));
        assert_eq!(groups[2].1[0].id, 284_053);
    }

    #[test]
    fn test_sort_by_rating() {
        // Arrange
        let mut movies = sample_result().movies;

        // Act
        sort_by_rating(&mut movies);

        // Assert
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![284_053, 10_195, 1_003_581]);
    }
}
