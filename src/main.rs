use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use podsplit::audio::{segment_on_voice, SegmenterConfig, VadConfig};
use podsplit::config::Config;
use podsplit::interactive;
use podsplit::library;
use podsplit::pipeline::{import_episode, print_summary, ImportConfig};
use podsplit::transcribe::{transcribe_files, WhisperClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "podsplit")]
#[command(version, about = "Export downloaded podcast episodes and split them for transcription")]
#[command(
    long_about = "Copy downloaded episodes out of the Apple Podcasts library, split them into \
speech-aligned chunks that fit transcription API limits, and optionally transcribe the chunks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Pick a downloaded episode from the podcast library and export it
    Import {
        /// Path to the Apple Podcasts SQLite database
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Directory to place exported shows under
        #[arg(long)]
        assets_dir: Option<PathBuf>,

        /// Segment target duration in minutes
        #[arg(short, long)]
        target_minutes: Option<u64>,

        /// Copy audio and artwork only, skip segmentation
        #[arg(long)]
        no_segment: bool,
    },

    /// Split an audio file on speech boundaries
    Segment {
        /// Input audio file
        input: PathBuf,

        /// Segment target duration in minutes
        #[arg(short, long)]
        target_minutes: Option<u64>,
    },

    /// Transcribe audio files, writing a .txt beside each input
    Transcribe {
        /// Input audio files
        inputs: Vec<PathBuf>,

        /// Source language code (e.g., en, ru)
        #[arg(short, long)]
        language: Option<String>,

        /// Number of concurrent API requests
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn segmenter_config(config: &Config, target_minutes: Option<u64>) -> Result<SegmenterConfig> {
    let minutes = target_minutes.unwrap_or(config.target_minutes);
    if minutes == 0 {
        anyhow::bail!("Target duration must be greater than 0 minutes");
    }
    Ok(SegmenterConfig {
        target_duration: Duration::from_secs(minutes * 60),
        vad: VadConfig::default(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    match cli.command {
        Command::Import {
            db_path,
            assets_dir,
            target_minutes,
            no_segment,
        } => {
            run_import(&config, db_path, assets_dir, target_minutes, no_segment).await?;
        }

        Command::Segment {
            input,
            target_minutes,
        } => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }

            let segmenter = segmenter_config(&config, target_minutes)?;
            let segments = segment_on_voice(&input, &segmenter)
                .await
                .context("Segmentation failed")?;

            if segments.is_empty() {
                println!("No voice detected, nothing to export.");
            } else {
                println!("Wrote {} segments:", segments.len());
                for segment in &segments {
                    println!("  {}", segment.display());
                }
            }
        }

        Command::Transcribe {
            inputs,
            language,
            concurrency,
        } => {
            if inputs.is_empty() {
                anyhow::bail!("Please provide at least one file to transcribe");
            }
            for input in &inputs {
                if !input.exists() {
                    anyhow::bail!("Input file not found: {}", input.display());
                }
            }

            config
                .validate_for_transcription()
                .context("Configuration validation failed")?;

            let api_key = config
                .openai_api_key
                .clone()
                .context("OPENAI_API_KEY not set")?;

            let mut client = WhisperClient::new(api_key);
            if let Some(lang) = language.or_else(|| config.language.clone()) {
                client = client.with_language(lang);
            }

            let results = transcribe_files(
                Arc::new(client),
                inputs,
                concurrency.unwrap_or(config.concurrency),
                true,
            )
            .await?;

            let mut failed = 0;
            for result in &results {
                match (&result.output, &result.error) {
                    (Some(output), _) => println!("  {}", output.display()),
                    (None, Some(error)) => {
                        failed += 1;
                        eprintln!("  {} failed: {}", result.input.display(), error);
                    }
                    _ => {}
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} files failed to transcribe", results.len());
            }
        }
    }

    Ok(())
}

async fn run_import(
    config: &Config,
    db_path: Option<PathBuf>,
    assets_dir: Option<PathBuf>,
    target_minutes: Option<u64>,
    no_segment: bool,
) -> Result<()> {
    let db_path = db_path
        .or_else(|| config.library_db_path())
        .context("Could not determine the podcast library location")?;

    if !db_path.exists() {
        anyhow::bail!("Database not found at {}", db_path.display());
    }

    interactive::print_header();

    let pool = library::open_library(&db_path)
        .await
        .context("Failed to open the podcast library")?;

    let shows = library::shows_with_downloads(&pool).await?;
    if shows.is_empty() {
        println!("No shows with downloaded episodes found.");
        return Ok(());
    }

    let show = interactive::select_show(&shows)?;

    let episodes = library::episodes_for_show(&pool, show.id).await?;
    if episodes.is_empty() {
        println!("No downloaded episodes found for {}.", show.title);
        return Ok(());
    }

    let episode = interactive::select_episode(show, &episodes)?;
    interactive::print_selection(show, episode);

    pool.close().await;

    let segmenter = if no_segment {
        None
    } else {
        Some(segmenter_config(config, target_minutes)?)
    };

    let import_config = ImportConfig {
        assets_dir: assets_dir.unwrap_or_else(|| config.assets_dir_path()),
        segmenter,
        show_progress: true,
    };

    let outcome = import_episode(show, episode, &import_config)
        .await
        .context("Import failed")?;

    info!("Imported to {}", outcome.episode_dir.display());
    print_summary(&outcome);

    Ok(())
}
