//! Usage counters persisted to a small JSON settings file. Storage failures
//! are logged and swallowed; a stats hiccup should never break a study
//! session.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::warn;

const KEY_DECKS_CREATED: &str = "decksCreated";
const KEY_CARDS_CREATED: &str = "cardsCreated";
const KEY_CARDS_REVIEWED: &str = "cardsReviewed";
const KEY_ANSWERS_CORRECT: &str = "answersCorrect";
const KEY_ANSWERS_INCORRECT: &str = "answersIncorrect";

/// `<user config dir>/MyFlashcardApp/Statistics.json`.
pub fn default_stats_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("MyFlashcardApp").join("Statistics.json"))
}

#[derive(Debug)]
pub struct StatsTracker {
    path: PathBuf,
}

impl StatsTracker {
    pub fn new(path: impl Into<PathBuf>) -> StatsTracker {
        StatsTracker { path: path.into() }
    }

    fn read_all(&self) -> BTreeMap<String, i64> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(counters) => counters,
            Err(err) => {
                warn!("[Stats] Ignoring unreadable stats file {:?}: {}", self.path, err);
                BTreeMap::new()
            }
        }
    }

    fn write_all(&self, counters: &BTreeMap<String, i64>) {
        let raw = match serde_json::to_string_pretty(counters) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("[Stats] Cannot serialize counters: {}", err);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("[Stats] Cannot create {:?}: {}", parent, err);
                return;
            }
        }
        if let Err(err) = fs::write(&self.path, raw) {
            warn!("[Stats] Cannot write stats file {:?}: {}", self.path, err);
        }
    }

    // Read-modify-write on a single counter; other counters are untouched.
    fn bump(&self, key: &str) {
        let mut counters = self.read_all();
        *counters.entry(key.to_string()).or_insert(0) += 1;
        self.write_all(&counters);
    }

    fn total(&self, key: &str) -> i64 {
        self.read_all().get(key).copied().unwrap_or(0)
    }

    pub fn track_deck_created(&self) {
        self.bump(KEY_DECKS_CREATED);
    }

    pub fn track_card_created(&self) {
        self.bump(KEY_CARDS_CREATED);
    }

    pub fn track_review(&self) {
        self.bump(KEY_CARDS_REVIEWED);
    }

    pub fn track_correct_answer(&self) {
        self.bump(KEY_ANSWERS_CORRECT);
    }

    pub fn track_incorrect_answer(&self) {
        self.bump(KEY_ANSWERS_INCORRECT);
    }

    pub fn total_decks(&self) -> i64 {
        self.total(KEY_DECKS_CREATED)
    }

    pub fn total_cards(&self) -> i64 {
        self.total(KEY_CARDS_CREATED)
    }

    pub fn total_reviews(&self) -> i64 {
        self.total(KEY_CARDS_REVIEWED)
    }

    pub fn total_correct(&self) -> i64 {
        self.total(KEY_ANSWERS_CORRECT)
    }

    pub fn total_incorrect(&self) -> i64 {
        self.total(KEY_ANSWERS_INCORRECT)
    }

    /// Clears the whole store.
    pub fn reset(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(err) = fs::remove_file(&self.path) {
            warn!("[Stats] Cannot remove stats file {:?}: {}", self.path, err);
        }
    }
}
