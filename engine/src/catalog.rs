//! Song catalog
//!
//! Owns the two song pools — not yet recommended and recommended — and the
//! manual add/remove/promote operations. Songs have no surrogate id: identity
//! is the case-insensitive (title, artist, genre) triple, and the two pools
//! stay disjoint under that identity at all times.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by manual catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("title, artist, and genre are required")]
    Validation,

    #[error("song is not in the not-yet-recommended pool")]
    NotFound,

    #[error("count must be an integer >= 1")]
    InvalidCount,

    #[error("not enough songs available to recommend: requested {requested}, have {available}")]
    InsufficientInventory { requested: usize, available: usize },
}

/// A song in the catalog
///
/// Immutable value with three required non-empty fields. Two songs are the
/// same song iff their [`SongKey`]s are equal; the derived `PartialEq` is
/// exact (case-sensitive) and only used by tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub genre: String,
}

impl Song {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            genre: genre.into(),
        }
    }

    /// Derived comparison key: the lower-cased field triple.
    pub fn key(&self) -> SongKey {
        SongKey {
            title: self.title.to_lowercase(),
            artist: self.artist.to_lowercase(),
            genre: self.genre.to_lowercase(),
        }
    }

    /// Case-insensitive structural equality on all three fields jointly.
    pub fn same_song(&self, other: &Song) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} ({})", self.title, self.artist, self.genre)
    }
}

/// Lower-cased (title, artist, genre) triple used for song identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongKey {
    title: String,
    artist: String,
    genre: String,
}

/// The pair of song pools tracking recommendation status
///
/// Order in `not_yet_recommended` is insertion order; order in `recommended`
/// is promotion order, oldest first. Failed operations leave both pools
/// untouched.
#[derive(Debug, Default)]
pub struct Catalog {
    not_yet_recommended: Vec<Song>,
    recommended: Vec<Song>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a song to the not-yet-recommended pool.
    ///
    /// Adding a song that is already queued (by [`SongKey`]) is a silent
    /// no-op. The recommended pool is not consulted here.
    pub fn add_song(&mut self, title: &str, artist: &str, genre: &str) -> Result<(), CatalogError> {
        if title.is_empty() || artist.is_empty() || genre.is_empty() {
            return Err(CatalogError::Validation);
        }
        let song = Song::new(title, artist, genre);
        if !pool_contains(&self.not_yet_recommended, &song) {
            tracing::debug!(%song, "queued song");
            self.not_yet_recommended.push(song);
        }
        Ok(())
    }

    /// Remove every queued song equal to `song`.
    ///
    /// Only songs still in the not-yet-recommended pool can be removed.
    pub fn remove_song(&mut self, song: &Song) -> Result<(), CatalogError> {
        if !pool_contains(&self.not_yet_recommended, song) {
            return Err(CatalogError::NotFound);
        }
        let key = song.key();
        self.not_yet_recommended.retain(|s| s.key() != key);
        tracing::debug!(%song, "removed song");
        Ok(())
    }

    /// Promote the first `count` queued songs, FIFO, into the recommended
    /// pool and return them in selection order (pre-move contents).
    pub fn generate_recommendation(&mut self, count: usize) -> Result<Vec<Song>, CatalogError> {
        if count == 0 {
            return Err(CatalogError::InvalidCount);
        }
        if self.not_yet_recommended.len() < count {
            return Err(CatalogError::InsufficientInventory {
                requested: count,
                available: self.not_yet_recommended.len(),
            });
        }
        let selected: Vec<Song> = self.not_yet_recommended[..count].to_vec();
        for song in &selected {
            self.promote(song);
        }
        tracing::info!(count, "promoted songs manually");
        Ok(selected)
    }

    /// Move a song into the recommended pool, dropping any queued copies.
    ///
    /// The duplicate check on the recommended side keeps the pool free of
    /// key-equal entries; pool disjointness makes it a no-op for songs
    /// arriving via [`Catalog::generate_recommendation`].
    pub(crate) fn promote(&mut self, song: &Song) {
        let key = song.key();
        self.not_yet_recommended.retain(|s| s.key() != key);
        if !pool_contains(&self.recommended, song) {
            self.recommended.push(song.clone());
        }
    }

    /// Snapshot of the recommended pool, oldest promotion first.
    pub fn recommended(&self) -> Vec<Song> {
        self.recommended.clone()
    }

    /// Snapshot of the not-yet-recommended pool, in insertion order.
    pub fn not_yet_recommended(&self) -> Vec<Song> {
        self.not_yet_recommended.clone()
    }
}

fn pool_contains(pool: &[Song], song: &Song) -> bool {
    pool.iter().any(|s| s.same_song(song))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize) -> Catalog {
        let mut catalog = Catalog::new();
        for i in 1..=n {
            catalog
                .add_song(
                    &format!("Song {}", i),
                    &format!("Artist {}", i),
                    &format!("Genre {}", i),
                )
                .expect("seed song");
        }
        catalog
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let a = Song::new("Blank Space", "Taylor Swift", "Pop");
        let b = Song::new("BLANK SPACE", "taylor swift", "POP");
        assert_eq!(a.key(), b.key());
        assert!(a.same_song(&b));

        let c = Song::new("Blank Space", "Taylor Swift", "Country");
        assert_ne!(a.key(), c.key());
        assert!(!a.same_song(&c));
    }

    #[test]
    fn test_add_requires_all_fields() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.add_song("", "Artist", "Genre"),
            Err(CatalogError::Validation)
        ));
        assert!(matches!(
            catalog.add_song("Title", "", "Genre"),
            Err(CatalogError::Validation)
        ));
        assert!(matches!(
            catalog.add_song("Title", "Artist", ""),
            Err(CatalogError::Validation)
        ));
        assert!(catalog.not_yet_recommended().is_empty());
    }

    #[test]
    fn test_add_is_idempotent_case_insensitive() {
        let mut catalog = Catalog::new();
        catalog.add_song("Blank Space", "Taylor Swift", "Pop").expect("add");
        catalog.add_song("BLANK SPACE", "taylor swift", "POP").expect("re-add");

        let queued = catalog.not_yet_recommended();
        assert_eq!(queued.len(), 1);
        // first spelling wins
        assert_eq!(queued[0].title, "Blank Space");
    }

    #[test]
    fn test_remove_absent_song_fails_and_leaves_catalog_unchanged() {
        let mut catalog = seeded(3);
        let absent = Song::new("Nope", "Nobody", "None");

        assert!(matches!(
            catalog.remove_song(&absent),
            Err(CatalogError::NotFound)
        ));
        assert_eq!(catalog.not_yet_recommended().len(), 3);
        assert!(catalog.recommended().is_empty());
    }

    #[test]
    fn test_remove_matches_case_insensitively() {
        let mut catalog = seeded(5);
        let target = Song::new("SONG 3", "artist 3", "GENRE 3");

        catalog.remove_song(&target).expect("remove");
        let queued = catalog.not_yet_recommended();
        assert_eq!(queued.len(), 4);
        assert!(!queued.iter().any(|s| s.same_song(&target)));
    }

    #[test]
    fn test_generate_selects_fifo_prefix() {
        let mut catalog = seeded(5);

        let selected = catalog.generate_recommendation(3).expect("promote");

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].title, "Song 1");
        assert_eq!(selected[1].title, "Song 2");
        assert_eq!(selected[2].title, "Song 3");
        assert_eq!(catalog.recommended().len(), 3);
        assert_eq!(catalog.not_yet_recommended().len(), 2);
        assert_eq!(catalog.not_yet_recommended()[0].title, "Song 4");
    }

    #[test]
    fn test_generate_rejects_zero_count() {
        let mut catalog = seeded(2);
        assert!(matches!(
            catalog.generate_recommendation(0),
            Err(CatalogError::InvalidCount)
        ));
        assert_eq!(catalog.not_yet_recommended().len(), 2);
    }

    #[test]
    fn test_generate_starved_mutates_nothing() {
        let mut catalog = seeded(2);

        let err = catalog.generate_recommendation(3).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InsufficientInventory {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(catalog.not_yet_recommended().len(), 2);
        assert!(catalog.recommended().is_empty());
    }

    #[test]
    fn test_promotion_order_is_oldest_first() {
        let mut catalog = seeded(4);
        catalog.generate_recommendation(2).expect("first batch");
        catalog.generate_recommendation(2).expect("second batch");

        let recommended = catalog.recommended();
        let titles: Vec<&str> = recommended.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Song 1", "Song 2", "Song 3", "Song 4"]);
    }

    #[test]
    fn test_snapshots_are_defensive() {
        let mut catalog = seeded(3);
        let before = catalog.not_yet_recommended();

        catalog.generate_recommendation(2).expect("promote");

        // the earlier snapshot is not retroactively changed
        assert_eq!(before.len(), 3);
        assert_eq!(catalog.not_yet_recommended().len(), 1);
    }

    #[test]
    fn test_pools_stay_disjoint_after_promotion() {
        let mut catalog = seeded(5);
        catalog.generate_recommendation(3).expect("promote");

        let recommended = catalog.recommended();
        for queued in catalog.not_yet_recommended() {
            assert!(!recommended.iter().any(|s| s.same_song(&queued)));
        }
    }
}
