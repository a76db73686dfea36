//! Running score and best score
//!
//! The best score is persisted as a plain integer, read once when a match
//! starts and written only when it is beaten.

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Score bookkeeping for the current match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchScore {
    /// Object balls pocketed since the last reset
    score: u32,
    /// High-water mark across matches
    best: u32,
}

impl MatchScore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "pool_best_score";

    /// Start a match with a known best score
    pub fn new(best: u32) -> Self {
        Self { score: 0, best }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Count a pocketed ball.
    ///
    /// Scratches never score. Returns the new best when this capture raised it.
    pub fn record_capture(&mut self, is_cue: bool) -> Option<u32> {
        if is_cue {
            return None;
        }

        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
            Some(self.best)
        } else {
            None
        }
    }

    /// Zero the running score; the best survives
    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// Seed a match from the stored best score
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<u32>(store, Self::STORAGE_KEY) {
            Ok(Some(best)) => {
                log::info!("Loaded best score {}", best);
                Self::new(best)
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored best score: {}", e);
                Self::default()
            }
        }
    }

    /// Write the best score
    pub fn save_best(&self, store: &mut dyn KeyValueStore) -> Result<(), PoolError> {
        save_json(store, Self::STORAGE_KEY, &self.best)?;
        log::info!("Best score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_scratch_never_scores() {
        let mut score = MatchScore::new(0);
        assert_eq!(score.record_capture(true), None);
        assert_eq!(score.score(), 0);
        assert_eq!(score.best(), 0);
    }

    #[test]
    fn test_best_only_moves_when_beaten() {
        let mut score = MatchScore::new(2);
        assert_eq!(score.record_capture(false), None);
        assert_eq!(score.record_capture(false), None);
        assert_eq!(score.score(), 2);
        assert_eq!(score.record_capture(false), Some(3));
        assert_eq!(score.best(), 3);

        score.reset();
        assert_eq!(score.score(), 0);
        assert_eq!(score.best(), 3);
        assert_eq!(score.record_capture(false), None);
    }

    #[test]
    fn test_load_and_save() {
        let mut store = MemoryStore::new();
        assert_eq!(MatchScore::load(&store), MatchScore::default());

        // Stored the way the page always has: a bare number
        store.set(MatchScore::STORAGE_KEY, "7").unwrap();
        assert_eq!(MatchScore::load(&store).best(), 7);

        MatchScore::new(9).save_best(&mut store).unwrap();
        assert_eq!(store.get(MatchScore::STORAGE_KEY).as_deref(), Some("9"));

        store.set(MatchScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(MatchScore::load(&store).best(), 0);
    }
}
