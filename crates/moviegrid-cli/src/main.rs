//! moviegrid - terminal movie browser backed by TMDB.

/// Interactive session state.
mod app;
/// External browser launching.
mod browser;
/// Session search cache.
mod cache;
/// Application configuration (TOML).
mod config;
/// Live-search debounce timer.
mod debounce;
/// Terminal UI.
mod tui;
/// Card view model.
mod view;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use moviegrid_api::catalog::Catalog;
use moviegrid_api::links;
use moviegrid_api::tmdb::TmdbClient;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::app::{App, Settings};
use crate::browser::{Browser, SystemBrowser};
use crate::config::{AppConfig, Credentials, resolve_config_path};
use crate::view::{DEFAULT_PER_GENRE, format_rating, genre_names, group_by_genre, sort_by_rating};

/// Log file name prefix; the file is `moviegrid.log`.
const LOG_FILE_PREFIX: &str = "moviegrid";

/// Where the `fmt` layer writes.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    /// One-shot commands print their results as log lines.
    Stdout,
    /// The interactive browser owns stdout, so logs go to a file in this
    /// directory.
    File(PathBuf),
}

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Config file path (overrides --dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies interactively (starts with the top rated list).
    Browse(BrowseArgs),
    /// Search movies by title ("best" lists top rated movies).
    Search(SearchArgs),
    /// List movie genres.
    Genres,
    /// Look up a movie's trailer.
    Trailer(TrailerArgs),
    /// Show details for a movie.
    Details(DetailsArgs),
    /// Write a config file with default settings.
    Init(InitArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Restrict searches to a genre ID.
    #[arg(long)]
    genre: Option<u32>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Movie title to search for.
    #[arg(long, required = true)]
    query: String,
    /// Restrict results to a genre ID.
    #[arg(long)]
    genre: Option<u32>,
    /// Group results under each genre, best rated first.
    #[arg(long)]
    by_genre: bool,
    /// Sort results by rating, highest first.
    #[arg(long)]
    sort: bool,
}

/// Arguments for the `trailer` subcommand.
#[derive(clap::Args)]
struct TrailerArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Open the trailer in the system browser.
    #[arg(long)]
    open: bool,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// TMDB v3 API key to store.
    #[arg(long)]
    api_key: Option<String>,
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Builds the catalog from config and environment credentials.
///
/// `TMDB_API_TOKEN` wins over `TMDB_API_KEY`, which wins over `tmdb.api_key`.
///
/// # Errors
///
/// Returns an error if no credentials are available, the base URL is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_catalog(config: &AppConfig) -> Result<Catalog<TmdbClient>> {
    let credentials = config
        .credentials(
            std::env::var("TMDB_API_TOKEN").ok(),
            std::env::var("TMDB_API_KEY").ok(),
        )
        .context(
            "TMDB credentials are required: set TMDB_API_TOKEN or TMDB_API_KEY, \
             or tmdb.api_key in the config file",
        )?;

    let mut builder = TmdbClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(config.tmdb.language.as_str());
    builder = match credentials {
        Credentials::Token(token) => builder.api_token(token),
        Credentials::ApiKey(key) => builder.api_key(key),
    };
    if let Some(base_url) = &config.tmdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    let client = builder.build().context("failed to build TMDB client")?;
    Ok(Catalog::new(client).with_display_limit(config.search.display_limit))
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the terminal fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    tracing::info!(genre = ?args.genre, "starting browser");
    let catalog = build_catalog(config)?;
    let settings = Settings {
        debounce: config.search.debounce(),
        min_query_len: config.search.min_query_len,
        error_timeout: config.ui.error_timeout(),
    };
    let mut app = App::new(catalog, SystemBrowser, settings).with_genre_filter(args.genre);
    tui::run_browser(&mut app).await
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank, the catalog cannot be built,
/// or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        bail!("query must not be empty");
    }
    let catalog = build_catalog(config)?;

    let mut result = catalog.fetch_movies(query, args.genre).await?;
    if result.is_empty() {
        tracing::info!("No movies found");
        return Ok(());
    }

    if args.by_genre {
        for (genre, movies) in group_by_genre(&result, DEFAULT_PER_GENRE) {
            tracing::info!("== {genre} ({})", movies.len());
            for movie in &movies {
                tracing::info!(
                    "{}\t{}\t{}",
                    movie.id,
                    format_rating(movie.vote_average),
                    movie.title
                );
            }
        }
        return Ok(());
    }

    if args.sort {
        sort_by_rating(&mut result.movies);
    }
    tracing::info!("ID\tRating\tTitle\tGenres");
    for movie in &result.movies {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.id,
            format_rating(movie.vote_average),
            movie.title,
            genre_names(&movie.genre_ids, &result.genres),
        );
    }

    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the genre list is
/// unavailable.
#[instrument(skip_all)]
async fn run_genres(config: &AppConfig) -> Result<()> {
    let catalog = build_catalog(config)?;
    let genres = catalog.fetch_genres().await;
    if genres.is_empty() {
        bail!("failed to load genres");
    }

    let mut entries: Vec<(u32, &str)> = genres.iter().collect();
    entries.sort_unstable_by_key(|(id, _)| *id);
    tracing::info!("ID\tName");
    for (id, name) in entries {
        tracing::info!("{id}\t{name}");
    }
    Ok(())
}

/// Runs the `trailer` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built, the API request fails,
/// or the browser cannot be opened.
#[instrument(skip_all)]
async fn run_trailer(args: &TrailerArgs, config: &AppConfig) -> Result<()> {
    let catalog = build_catalog(config)?;
    let Some(key) = catalog.fetch_trailer_key(args.id).await? else {
        tracing::info!("Trailer not found!");
        return Ok(());
    };

    let url = links::trailer_url(&key);
    tracing::info!("{url}");
    if args.open {
        SystemBrowser.open(&url)?;
    }
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or the API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, config: &AppConfig) -> Result<()> {
    let catalog = build_catalog(config)?;
    let details = catalog.fetch_details(args.id).await?;

    tracing::info!("Title:    {}", details.title);
    tracing::info!(
        "Released: {}",
        details.release_date.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Rating:   {} ({} votes)",
        format_rating(details.vote_average),
        details.vote_count
    );
    tracing::info!(
        "Runtime:  {}",
        details
            .runtime
            .map_or_else(|| String::from("-"), |m| format!("{m} min"))
    );
    tracing::info!("Genres:   {}", details.genres.join(", "));
    tracing::info!("Page:     {}", links::movie_page_url(details.id));
    if let Some(overview) = &details.overview {
        tracing::info!("{overview}");
    }
    Ok(())
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
#[instrument(skip_all)]
fn run_init(args: &InitArgs, path: &std::path::Path) -> Result<()> {
    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let mut config = AppConfig::default();
    config.tmdb.api_key.clone_from(&args.api_key);
    config.save(path)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Picks the log destination for `command`.
fn log_target(command: &Commands, config_path: &Path) -> LogTarget {
    match command {
        Commands::Browse(_) => LogTarget::File(
            config_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        ),
        _ => LogTarget::Stdout,
    }
}

/// Installs the global subscriber.
///
/// Returns the file writer's guard, which must live until exit so buffered
/// lines are flushed.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
fn init_logging(target: &LogTarget) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = match target {
        LogTarget::Stdout => (BoxMakeWriter::new(std::io::stdout), None),
        LogTarget::File(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("failed to open log file in {}", dir.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
    };
    let ansi = *target == LogTarget::Stdout;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(guard)
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.dir.as_deref(), cli.config.as_deref())?;
    let _log_guard = init_logging(&log_target(&cli.command, &config_path))?;
    let load_config = || AppConfig::load(&config_path);

    match &cli.command {
        Commands::Browse(args) => run_browse(args, &load_config()?).await,
        Commands::Search(args) => run_search(args, &load_config()?).await,
        Commands::Genres => run_genres(&load_config()?).await,
        Commands::Trailer(args) => run_trailer(args, &load_config()?).await,
        Commands::Details(args) => run_details(args, &load_config()?).await,
        Commands::Init(args) => run_init(args, &config_path),
    }
}
