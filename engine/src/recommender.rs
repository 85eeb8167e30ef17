//! LLM-assisted recommendation protocol
//!
//! Drives the two-phase generate-then-verify pipeline around an executor:
//! build a generation prompt from the catalog, parse and validate the reply,
//! round-trip a verification prompt, and only then promote the candidates.
//! Every stage has a typed failure; any failure is terminal for the call and
//! leaves the catalog untouched.

use crate::catalog::{Catalog, Song};
use crate::llm::{extract_json_object, LlmError, LlmExecutor};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the recommendation protocol
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("count must be an integer >= 1")]
    InvalidCount,

    #[error("executor failed: {0}")]
    Executor(#[from] LlmError),

    #[error("could not parse recommendations: {0}")]
    Parse(String),

    #[error("expected exactly {requested} usable songs, got {received}")]
    CountMismatch { requested: usize, received: usize },

    #[error("verification reply must be \"1\" or \"0\", got {0:?}")]
    Protocol(String),

    #[error("some recommended songs could not be verified to exist")]
    Unverified,
}

/// Two-phase LLM recommendation flow over a [`Catalog`]
pub struct Recommender {
    executor: Arc<dyn LlmExecutor>,
}

impl Recommender {
    pub fn new(executor: Arc<dyn LlmExecutor>) -> Self {
        Self { executor }
    }

    /// Ask the executor for exactly `count` new songs, verify they exist with
    /// a second round-trip, and promote them into the recommended pool.
    ///
    /// `basis_songs`, when non-empty, steer the model away from their style;
    /// otherwise the prompt asks for broadly trending songs. The catalog is
    /// mutated only after both round-trips succeed. Retry policy, if any,
    /// belongs to the caller.
    pub async fn recommend(
        &self,
        catalog: &mut Catalog,
        count: usize,
        basis_songs: &[Song],
    ) -> Result<Vec<Song>, RecommendError> {
        if count == 0 {
            return Err(RecommendError::InvalidCount);
        }

        let queued = catalog.not_yet_recommended();
        let prompt = build_generation_prompt(count, &queued, basis_songs);
        tracing::debug!(
            executor = self.executor.name(),
            count,
            "requesting song recommendations"
        );
        let raw = self.executor.execute(&prompt).await?;
        tracing::debug!(chars = raw.len(), "generation reply received");

        let parsed = parse_recommendations(&raw, &queued)?;
        for issue in &parsed.issues {
            tracing::warn!("skipped LLM song entry: {}", issue);
        }
        let candidates = parsed.candidates;
        if candidates.len() != count {
            return Err(RecommendError::CountMismatch {
                requested: count,
                received: candidates.len(),
            });
        }

        tracing::debug!(count = candidates.len(), "verifying candidates exist");
        let verify_raw = self.executor.execute(&build_verification_prompt(&candidates)).await?;
        if !parse_verification_reply(&verify_raw)? {
            return Err(RecommendError::Unverified);
        }

        for song in &candidates {
            catalog.promote(song);
        }
        tracing::info!(count = candidates.len(), "promoted verified recommendations");
        Ok(candidates)
    }
}

#[derive(Debug)]
struct ParsedRecommendations {
    candidates: Vec<Song>,
    /// Per-entry validation diagnostics; non-fatal
    issues: Vec<String>,
}

/// Parse the generation reply: extract the JSON object, validate each entry,
/// and drop entries key-equal to a queued song (silently, not as an issue).
fn parse_recommendations(
    raw: &str,
    queued: &[Song],
) -> Result<ParsedRecommendations, RecommendError> {
    let json_str = extract_json_object(raw)
        .ok_or_else(|| RecommendError::Parse("no JSON object found in reply".to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| RecommendError::Parse(e.to_string()))?;
    let entries = value
        .get("songs")
        .and_then(|s| s.as_array())
        .ok_or_else(|| RecommendError::Parse("missing songs array".to_string()))?;

    let mut candidates: Vec<Song> = Vec::new();
    let mut issues = Vec::new();
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            issues.push("song entry is not an object".to_string());
            continue;
        };
        let Some(title) = nonblank_str(obj.get("song")) else {
            issues.push("missing or invalid song title".to_string());
            continue;
        };
        let Some(artist) = nonblank_str(obj.get("artist")) else {
            issues.push(format!("missing or invalid artist for {:?}", title));
            continue;
        };
        let Some(genre) = nonblank_str(obj.get("genre")) else {
            issues.push(format!("missing or invalid genre for {:?}", title));
            continue;
        };
        let candidate = Song::new(title, artist, genre);
        if queued.iter().any(|s| s.same_song(&candidate)) {
            continue;
        }
        candidates.push(candidate);
    }

    Ok(ParsedRecommendations { candidates, issues })
}

/// String value that is non-empty after trimming; the untrimmed text is kept.
fn nonblank_str(value: Option<&serde_json::Value>) -> Option<&str> {
    let s = value?.as_str()?;
    (!s.trim().is_empty()).then_some(s)
}

/// The reply contract is the exact literal "1" or "0"; anything else is a
/// protocol violation rather than a recoverable no.
fn parse_verification_reply(raw: &str) -> Result<bool, RecommendError> {
    match raw {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(RecommendError::Protocol(other.to_string())),
    }
}

fn build_generation_prompt(count: usize, queued: &[Song], basis_songs: &[Song]) -> String {
    let basis_section = if basis_songs.is_empty() {
        "Choose currently trending songs across popular genres.".to_string()
    } else {
        format!(
            "CHOOSE SONGS THAT ARE VERY DIFFERENT IN STYLE, GENRE, OR ARTIST FROM THE \
             FOLLOWING. THE GOAL IS TO GROW THE LISTENER'S MUSIC TASTE, SO DO NOT WORRY \
             IF THEY MIGHT NOT LIKE THE SONGS:\n{}",
            song_lines(basis_songs)
        )
    };

    let catalog_section = if queued.is_empty() {
        "- (none)".to_string()
    } else {
        song_lines(queued)
    };

    format!(
        "You are a helpful music recommendation assistant.\n\
         Recommend EXACTLY {count} new songs.\n\n\
         CRITICAL REQUIREMENTS:\n\
         1. Return ONLY valid JSON. No leading/trailing text.\n\
         2. The JSON MUST match this exact schema:\n\
         {{\"songs\": [{{ \"song\": String, \"artist\": String, \"genre\": String }}]}}\n\
         3. Provide exactly {count} distinct songs.\n\
         4. DO NOT RECOMMEND SONGS THAT ARE ALREADY IN THE CATALOG.\n\
         5. DO NOT RECOMMEND THE SAME SONG TWICE.\n\
         6. {basis_section}\n\n\
         ALREADY IN CATALOG (avoid duplicates by title+artist):\n\
         {catalog_section}\n\
         Return ONLY the JSON object, no additional text."
    )
}

fn build_verification_prompt(candidates: &[Song]) -> String {
    format!(
        "You are a helpful music recommendation assistant.\n\
         Verify that all of the following songs exist:\n\
         {}\n\
         If all the songs exist, return the number 1 and nothing else. \
         If any of the songs do not exist, return the number 0 and nothing else.",
        song_lines(candidates)
    )
}

/// Render songs as `- <title> by <artist> (<genre>)` lines.
fn song_lines(songs: &[Song]) -> String {
    songs
        .iter()
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}
