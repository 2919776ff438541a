use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::artwork::download_artwork;
use crate::audio::{segment_on_voice, SegmenterConfig};
use crate::error::{PodsplitError, Result};
use crate::library::{asset_path, Episode, Show};

/// Configuration for an episode import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Root directory imported shows are placed under.
    pub assets_dir: PathBuf,

    /// Segmentation settings; `None` skips segmentation.
    pub segmenter: Option<SegmenterConfig>,

    /// Show progress spinners.
    pub show_progress: bool,
}

/// What an import produced.
#[derive(Debug)]
pub struct ImportOutcome {
    pub episode_dir: PathBuf,
    pub audio_path: PathBuf,
    pub artwork: Vec<PathBuf>,
    pub segments: Vec<PathBuf>,
}

/// Replace characters that would change the directory layout when a title is
/// used as a path component.
fn safe_name(title: &str) -> String {
    title.replace(['/', ':'], "-").trim().to_string()
}

fn spinner(show_progress: bool, message: &str) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Copy one episode (audio + artwork) out of the player's cache into the
/// assets tree, then split the audio on speech boundaries.
///
/// Artwork failures are logged and skipped: the audio is the point of the
/// import. Anything else aborts, leaving already-written files in place.
pub async fn import_episode(
    show: &Show,
    episode: &Episode,
    config: &ImportConfig,
) -> Result<ImportOutcome> {
    let show_dir = config.assets_dir.join(safe_name(&show.title));
    let episode_dir = show_dir.join(safe_name(&episode.title));
    std::fs::create_dir_all(&episode_dir)?;

    info!("Importing {} / {}", show.title, episode.title);

    // Copy the audio out of the player cache.
    let source = asset_path(&episode.asset_url)?;
    if !source.exists() {
        return Err(PodsplitError::FileNotFound(source.display().to_string()));
    }

    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp3".to_string());
    let audio_path = episode_dir.join(format!("{}.{}", safe_name(&episode.title), extension));

    let copy_pb = spinner(config.show_progress, "Copying episode audio...");
    std::fs::copy(&source, &audio_path)?;
    if let Some(pb) = copy_pb {
        pb.finish_with_message(format!("✓ Copied audio to {}", audio_path.display()));
    }
    debug!("Copied {} to {}", source.display(), audio_path.display());

    // Artwork, show-level then episode-level.
    let client = reqwest::Client::new();
    let mut artwork = Vec::new();

    let targets = [
        (
            show.artwork_template_url.as_deref(),
            show_dir.join(format!("{}.png", safe_name(&show.title))),
        ),
        (
            episode.artwork_template_url.as_deref(),
            episode_dir.join(format!("{}.png", safe_name(&episode.title))),
        ),
    ];

    for (template, dest) in targets {
        let Some(template) = template else { continue };
        match download_artwork(&client, template, &dest).await {
            Ok(_) => artwork.push(dest),
            Err(e) => warn!("Skipping artwork {}: {e}", dest.display()),
        }
    }

    // Segmentation.
    let segments = match &config.segmenter {
        Some(segmenter) => {
            let pb = spinner(config.show_progress, "Segmenting audio...");
            let segments = segment_on_voice(&audio_path, segmenter).await?;
            if let Some(pb) = pb {
                pb.finish_with_message(format!("✓ Wrote {} segments", segments.len()));
            }
            segments
        }
        None => vec![],
    };

    Ok(ImportOutcome {
        episode_dir,
        audio_path,
        artwork,
        segments,
    })
}

/// Print a human summary of an import.
pub fn print_summary(outcome: &ImportOutcome) {
    println!();
    println!("  Episode:  {}", outcome.audio_path.display());
    println!("  Artwork:  {} files", outcome.artwork.len());
    if outcome.segments.is_empty() {
        println!("  Segments: none (no voice detected or segmentation skipped)");
    } else {
        println!("  Segments: {}", outcome.segments.len());
        for segment in &outcome.segments {
            println!("    {}", segment.display());
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_name_replaces_separators() {
        assert_eq!(safe_name("AI/ML: The Podcast"), "AI-ML- The Podcast");
        assert_eq!(safe_name("Plain Title"), "Plain Title");
    }

    #[test]
    fn test_import_config_fields() {
        let config = ImportConfig {
            assets_dir: PathBuf::from("assets"),
            segmenter: Some(SegmenterConfig::default()),
            show_progress: false,
        };
        assert_eq!(
            config.segmenter.unwrap().target_duration,
            Duration::from_secs(20 * 60)
        );
    }
}
