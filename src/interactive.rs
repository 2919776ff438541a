use console::style;
use dialoguer::Select;

use crate::library::{Episode, Show};

pub fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        podsplit - Podcast Episode Exporter        ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

/// Pick one show out of those with downloaded episodes.
pub fn select_show(shows: &[Show]) -> anyhow::Result<&Show> {
    let items: Vec<String> = shows.iter().map(|s| s.title.clone()).collect();

    let selection = Select::new()
        .with_prompt("Select a podcast show")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(&shows[selection])
}

/// Pick one downloaded episode of a show.
pub fn select_episode<'a>(show: &Show, episodes: &'a [Episode]) -> anyhow::Result<&'a Episode> {
    let items: Vec<String> = episodes.iter().map(|e| e.title.clone()).collect();

    let selection = Select::new()
        .with_prompt(format!("Select an episode from {}", show.title))
        .items(&items)
        .default(0)
        .interact()?;

    Ok(&episodes[selection])
}

pub fn print_selection(show: &Show, episode: &Episode) {
    println!();
    println!(
        "  {} / {}",
        style(&show.title).cyan(),
        style(&episode.title).cyan()
    );
    println!();
}
