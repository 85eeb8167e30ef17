//! Command handlers
//!
//! Implements the tunescout subcommands on top of the catalog and the
//! recommendation protocol. The binary prints human-readable pool listings;
//! structured diagnostics go through tracing.

use crate::catalog::{Catalog, Song};
use crate::config::Config;
use crate::errors::EngineError;
use crate::llm::build_executor;
use crate::recommender::Recommender;

/// Parse a "Title|Artist|Genre" triple from the command line.
pub fn parse_song_spec(spec: &str) -> Result<Song, EngineError> {
    let mut parts = spec.splitn(3, '|').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(title), Some(artist), Some(genre))
            if !title.is_empty() && !artist.is_empty() && !genre.is_empty() =>
        {
            Ok(Song::new(title, artist, genre))
        }
        _ => Err(EngineError::InvalidSongSpec(spec.to_string())),
    }
}

fn print_pools(catalog: &Catalog) {
    println!("Recommended:");
    let recommended = catalog.recommended();
    if recommended.is_empty() {
        println!("  (none)");
    }
    for song in &recommended {
        println!("  - {}", song);
    }

    println!("Not yet recommended:");
    let queued = catalog.not_yet_recommended();
    if queued.is_empty() {
        println!("  (none)");
    }
    for song in &queued {
        println!("  - {}", song);
    }
}

/// Offline walkthrough of the manual catalog flow.
pub fn handle_demo() -> anyhow::Result<()> {
    const SAMPLE_SONGS: [(&str, &str, &str); 5] = [
        ("Blank Space", "Taylor Swift", "Pop"),
        ("Midnight City", "M83", "Synth-pop"),
        ("Ride", "Twenty One Pilots", "Alternative"),
        ("Take Five", "Dave Brubeck", "Jazz"),
        ("Hurt", "Johnny Cash", "Country"),
    ];

    let mut catalog = Catalog::new();
    for (title, artist, genre) in SAMPLE_SONGS {
        catalog.add_song(title, artist, genre)?;
    }
    println!("Seeded {} songs.", SAMPLE_SONGS.len());

    let promoted = catalog.generate_recommendation(3)?;
    println!("Promoted the first {} songs:", promoted.len());
    for song in &promoted {
        println!("  - {}", song);
    }

    let dropped = Song::new("Hurt", "Johnny Cash", "Country");
    catalog.remove_song(&dropped)?;
    println!("Removed {} from the queue.", dropped);

    print_pools(&catalog);
    Ok(())
}

/// Live LLM-assisted flow against the configured executor.
pub async fn handle_suggest(
    config: &Config,
    count: usize,
    seed: &[String],
    basis: &[String],
) -> anyhow::Result<()> {
    let executor = build_executor(&config.llm)?;
    tracing::info!(executor = executor.name(), count, "running suggestion flow");

    let mut catalog = Catalog::new();
    for spec in seed {
        let song = parse_song_spec(spec)?;
        catalog.add_song(&song.title, &song.artist, &song.genre)?;
    }

    let basis_songs = basis
        .iter()
        .map(|spec| parse_song_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let recommender = Recommender::new(executor);
    let songs = recommender.recommend(&mut catalog, count, &basis_songs).await?;

    println!("The model suggested {} verified songs:", songs.len());
    for song in &songs {
        println!("  - {}", song);
    }
    print_pools(&catalog);
    Ok(())
}
