mod app;
mod bridge;
mod command;
mod display;

use crate::app::App;
use crate::bridge::run_display_bridge;
use crate::command::Command;
use crate::display::TerminalDisplay;
use clap::Parser;
use lyricplayer_core::{
    Catalog, CoreError, FileSource, LyricsLoader, LyricsSource, Player, PlayerConfig,
};
use lyricplayer_source_http::HttpSource;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Play songs with timestamp-synchronized lyrics in the terminal
#[derive(Debug, Parser)]
#[command(name = "lyricplayer", version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/lyricplayer/config.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Song id to start playing right away
    #[arg(short, long, value_name = "ID")]
    song: Option<u32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(PlayerConfig::config_path);

    // Check config for logging.enabled before full config load
    init_tracing(check_file_logging_enabled(&config_path));

    let config = match PlayerConfig::load_or_create(&config_path) {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            println!(
                "A configuration file has been created at {}.\n\
                Add your songs to it and run lyricplayer again.",
                path.display()
            );
            return ExitCode::SUCCESS;
        }
        Err(CoreError::ConfigParseError(parse_error)) => {
            error!(
                "Config file {} has a syntax error: {parse_error}",
                config_path.display()
            );
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let exit_code = runtime.block_on(run(config, cli.song));

    // A pending stdin read cannot be cancelled; don't wait for it
    runtime.shutdown_timeout(Duration::from_millis(100));
    exit_code
}

async fn run(config: PlayerConfig, initial_song: Option<u32>) -> ExitCode {
    let catalog = match load_catalog(&config).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load song catalog: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} song(s)", catalog.len());

    let loader = Arc::new(LyricsLoader::new(
        create_sources(&config),
        config.lyrics.demo_fallback,
    ));
    info!("Lyrics sources: {:?}", loader.source_names());

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    // Set up Ctrl+C handler to trigger graceful shutdown
    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    let player = Player::new(catalog);
    let bridge = tokio::spawn(run_display_bridge(
        player.subscribe(),
        TerminalDisplay::new(std::io::stdout()),
    ));

    let mut app = App::new(player, loader, config.playback.clone());
    if let Some(id) = initial_song {
        app.handle(Command::Play(id));
    }
    app.run(cancel_token).await;

    // Dropping the player closes the event channel and ends the bridge
    drop(app);
    if let Err(e) = bridge.await {
        warn!("Display bridge ended abnormally: {e}");
    }

    ExitCode::SUCCESS
}

/// Inline songs from the config, followed by the catalog file if one is set
async fn load_catalog(config: &PlayerConfig) -> Result<Catalog, CoreError> {
    let mut songs = config.songs.clone();
    if let Some(path) = &config.catalog.path {
        info!("Reading song catalog from {}", path.display());
        songs.extend(Catalog::read_json(path).await?);
    }
    Catalog::new(songs)
}

fn create_sources(config: &PlayerConfig) -> Vec<Box<dyn LyricsSource>> {
    let mut sources: Vec<Box<dyn LyricsSource>> = Vec::new();

    match HttpSource::with_settings(config.lyrics.http_timeout_secs, config.lyrics.http_max_retries)
    {
        Ok(source) => sources.push(Box::new(source)),
        Err(e) => error!("Failed to create HTTP lyrics source: {}", e),
    }
    sources.push(Box::new(FileSource::new(config.lyrics.base_dir.clone())));

    sources
}

/// Check if file logging is enabled by reading the config file.
/// This is done before full config loading to set up tracing first.
/// Returns `false` if config doesn't exist or can't be parsed.
fn check_file_logging_enabled(config_path: &Path) -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let Ok(content) = std::fs::read_to_string(config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    // HTTP client internals stay quiet unless RUST_LOG asks for them
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,reqwest_retry=warn,hyper_util=warn"));

    // Logs go to stderr so they don't interleave with the lyrics on stdout
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if file_logging_enabled {
        let log_path = lyricplayer_core::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
