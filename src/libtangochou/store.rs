//! Deck persistence: a JSON document store keyed by deck name.
//!
//! Every mutating operation autosaves the full collection unless autosave is
//! suppressed for a batch. Callers that want to edit a deck check out a copy
//! and commit it back; the commit is what persists.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{json, Value};

use crate::libtangochou::deck::{Deck, Flashcard};
use crate::libtangochou::error::StoreError;

pub const STORE_VERSION: u32 = 1;
const IMPORT_PLACEHOLDER_NAME: &str = "Imported Deck";

/// Where the deck collection lives when no path is given on the command
/// line: `<user data dir>/MyFlashcardApp/decks.json`.
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("MyFlashcardApp").join("decks.json"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct DeckStore {
    path: PathBuf,
    decks: BTreeMap<String, Deck>,
    autosave: bool,
}

impl DeckStore {
    /// Creates an empty store bound to `path`. No I/O happens until
    /// [`DeckStore::load`] or a mutation.
    pub fn new(path: impl Into<PathBuf>) -> DeckStore {
        DeckStore {
            path: path.into(),
            decks: BTreeMap::new(),
            autosave: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory collection with the contents of the store
    /// file. A missing file is a first run and loads as empty. Entries in
    /// the `decks` array that are not objects are skipped and counted in
    /// the report.
    pub fn load(&mut self) -> Result<LoadReport, StoreError> {
        if !self.path.exists() {
            info!("[Store] No store file at {:?} yet, starting empty", self.path);
            self.decks.clear();
            return Ok(LoadReport::default());
        }

        let raw = fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&raw)?;
        let Some(root) = root.as_object() else {
            return Err(StoreError::Malformed(
                "top level is not a JSON object".to_string(),
            ));
        };

        self.decks.clear();
        let mut report = LoadReport::default();
        if let Some(entries) = root.get("decks").and_then(Value::as_array) {
            for entry in entries {
                if entry.is_object() {
                    let deck = deck_from_value(entry);
                    self.decks.insert(deck.name.clone(), deck);
                    report.loaded += 1;
                } else {
                    warn!("[Store] Skipping non-object deck entry: {}", entry);
                    report.skipped += 1;
                }
            }
        }
        debug!(
            "[Store] Loaded {} decks from {:?} ({} skipped)",
            report.loaded, self.path, report.skipped
        );
        Ok(report)
    }

    /// Writes the whole collection as `{"version": 1, "decks": [...]}`,
    /// creating parent directories as needed. The write goes through a temp
    /// file in the same directory and a rename, so a crash mid-write never
    /// leaves a half-written store behind.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let root = json!({
            "version": STORE_VERSION,
            "decks": self.decks.values().collect::<Vec<_>>(),
        });
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&root)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("[Store] Saved {} decks to {:?}", self.decks.len(), self.path);
        Ok(())
    }

    /// Suppress or re-enable autosave. Re-enabling does not save by itself;
    /// callers batching mutations finish with an explicit [`DeckStore::save`].
    pub fn set_autosave(&mut self, enabled: bool) {
        self.autosave = enabled;
    }

    fn maybe_autosave(&self) -> Result<(), StoreError> {
        if self.autosave {
            self.save()
        } else {
            Ok(())
        }
    }

    /// Inserts (or overwrites) the deck under its current name.
    pub fn add_deck(&mut self, deck: Deck) -> Result<(), StoreError> {
        debug!("[Store] Adding deck '{}'", deck.name);
        self.decks.insert(deck.name.clone(), deck);
        self.maybe_autosave()
    }

    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.decks.get(name)
    }

    /// Fetches a copy of a deck for editing. Pair with [`DeckStore::commit`].
    pub fn checkout(&self, name: &str) -> Option<Deck> {
        self.decks.get(name).cloned()
    }

    /// Reinserts an edited deck under its name and persists it.
    pub fn commit(&mut self, deck: Deck) -> Result<(), StoreError> {
        self.add_deck(deck)
    }

    /// Removes the deck, returning whether anything was removed.
    pub fn remove_deck(&mut self, name: &str) -> Result<bool, StoreError> {
        if self.decks.remove(name).is_none() {
            return Ok(false);
        }
        debug!("[Store] Removed deck '{}'", name);
        self.maybe_autosave()?;
        Ok(true)
    }

    /// Renames a deck. Renaming onto an existing name is rejected rather
    /// than overwriting the other deck.
    pub fn rename_deck(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        if old == new {
            return Ok(());
        }
        if self.decks.contains_key(new) {
            return Err(StoreError::DuplicateName(new.to_string()));
        }
        let mut deck = self
            .decks
            .remove(old)
            .ok_or_else(|| StoreError::NotFound(old.to_string()))?;
        deck.name = new.to_string();
        self.decks.insert(new.to_string(), deck);
        info!("[Store] Renamed deck '{}' to '{}'", old, new);
        self.maybe_autosave()
    }

    pub fn deck_names(&self) -> Vec<String> {
        self.decks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Writes a single deck as `{"version": 1, "deck": {...}}`.
    pub fn export_deck(&self, name: &str, path: &Path) -> Result<(), StoreError> {
        let deck = self
            .decks
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let root = json!({ "version": STORE_VERSION, "deck": deck });
        fs::write(path, serde_json::to_string_pretty(&root)?)?;
        info!("[Store] Exported deck '{}' to {:?}", name, path);
        Ok(())
    }

    /// Writes the entire collection in the same shape as the store file.
    pub fn export_all(&self, path: &Path) -> Result<(), StoreError> {
        let root = json!({
            "version": STORE_VERSION,
            "decks": self.decks.values().collect::<Vec<_>>(),
        });
        fs::write(path, serde_json::to_string_pretty(&root)?)?;
        info!("[Store] Exported {} decks to {:?}", self.decks.len(), path);
        Ok(())
    }

    /// Reads a deck from a JSON file, accepting either `{"deck": {...}}` or
    /// a bare deck object. A blank name becomes a placeholder, and name
    /// collisions get the smallest unused `" (n)"` suffix, probing from 2.
    /// Returns the name the deck ended up under.
    pub fn import_deck(&mut self, path: &Path) -> Result<String, StoreError> {
        let raw = fs::read_to_string(path)?;
        let root: Value = serde_json::from_str(&raw)?;
        if !root.is_object() {
            return Err(StoreError::Malformed(
                "top level is not a JSON object".to_string(),
            ));
        }

        let deck_value = match root.get("deck") {
            Some(value) if value.is_object() => value,
            _ => &root,
        };
        let mut deck = deck_from_value(deck_value);

        let base = deck.name.trim();
        let base = if base.is_empty() {
            IMPORT_PLACEHOLDER_NAME.to_string()
        } else {
            base.to_string()
        };
        let name = self.unique_import_name(base);
        deck.name = name.clone();
        self.add_deck(deck)?;
        info!("[Store] Imported deck '{}' from {:?}", name, path);
        Ok(name)
    }

    fn unique_import_name(&self, base: String) -> String {
        if !self.decks.contains_key(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{} ({})", base, suffix);
            if !self.decks.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

// Field-lenient deck parse matching the store schema: missing or wrongly
// typed fields become empty, non-object card entries are dropped.
fn deck_from_value(value: &Value) -> Deck {
    let mut deck = Deck::new(
        value.get("name").and_then(Value::as_str).unwrap_or_default(),
        value.get("tag").and_then(Value::as_str).unwrap_or_default(),
    );
    if let Some(cards) = value.get("cards").and_then(Value::as_array) {
        for card in cards {
            if !card.is_object() {
                continue;
            }
            deck.add_card(Flashcard::new(
                card.get("question").and_then(Value::as_str).unwrap_or_default(),
                card.get("answer").and_then(Value::as_str).unwrap_or_default(),
            ));
        }
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (DeckStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DeckStore::new(dir.path().join("decks.json"));
        (store, dir)
    }

    fn geo_deck() -> Deck {
        let mut deck = Deck::new("Geo", "school");
        deck.add_card(Flashcard::new("Capital of France?", "Paris"));
        deck.add_card(Flashcard::new("Capital of Japan?", "Tokyo"));
        deck
    }

    #[test]
    fn load_missing_file_is_empty_success() {
        let (mut store, _dir) = test_store();
        let report = store.load().unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (mut store, dir) = test_store();
        store.add_deck(geo_deck()).unwrap();
        store.add_deck(Deck::new("History", "school")).unwrap();

        let mut reloaded = DeckStore::new(dir.path().join("decks.json"));
        let report = reloaded.load().unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(reloaded.deck_names(), vec!["Geo", "History"]);
        assert_eq!(reloaded.deck("Geo"), Some(&geo_deck()));
    }

    #[test]
    fn saved_file_has_versioned_shape() {
        let (mut store, _dir) = test_store();
        store.add_deck(geo_deck()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let root: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(root["version"], 1);
        assert_eq!(root["decks"].as_array().unwrap().len(), 1);
        assert_eq!(root["decks"][0]["name"], "Geo");
        assert_eq!(root["decks"][0]["cards"][0]["question"], "Capital of France?");
    }

    #[test]
    fn load_rejects_invalid_json() {
        let (mut store, _dir) = test_store();
        fs::write(store.path(), "not json at all").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Parse(_))));
    }

    #[test]
    fn load_rejects_non_object_root() {
        let (mut store, _dir) = test_store();
        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn load_skips_malformed_entries() {
        let (mut store, _dir) = test_store();
        fs::write(
            store.path(),
            r#"{"version": 1, "decks": [{"name": "Geo", "tag": "", "cards": []}, 42, "bogus"]}"#,
        )
        .unwrap();
        let report = store.load().unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(store.deck_names(), vec!["Geo"]);
    }

    #[test]
    fn add_then_get_returns_equal_deck() {
        let (mut store, _dir) = test_store();
        store.add_deck(geo_deck()).unwrap();
        assert_eq!(store.deck("Geo"), Some(&geo_deck()));
    }

    #[test]
    fn remove_deck_drops_the_name() {
        let (mut store, _dir) = test_store();
        store.add_deck(geo_deck()).unwrap();
        assert!(store.remove_deck("Geo").unwrap());
        assert!(store.deck_names().is_empty());
        assert!(!store.remove_deck("Geo").unwrap());
    }

    #[test]
    fn checkout_and_commit_persist_edits() {
        let (mut store, dir) = test_store();
        store.add_deck(geo_deck()).unwrap();

        let mut deck = store.checkout("Geo").unwrap();
        deck.add_card(Flashcard::new("Capital of Italy?", "Rome"));
        store.commit(deck).unwrap();

        let mut reloaded = DeckStore::new(dir.path().join("decks.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.deck("Geo").unwrap().len(), 3);
    }

    #[test]
    fn rename_moves_deck_to_new_key() {
        let (mut store, _dir) = test_store();
        store.add_deck(geo_deck()).unwrap();
        store.rename_deck("Geo", "Geography").unwrap();
        assert!(store.deck("Geo").is_none());
        assert_eq!(store.deck("Geography").unwrap().name, "Geography");
    }

    #[test]
    fn rename_rejects_collision_and_changes_nothing() {
        let (mut store, _dir) = test_store();
        store.add_deck(geo_deck()).unwrap();
        store.add_deck(Deck::new("History", "school")).unwrap();

        let err = store.rename_deck("Geo", "History").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(name) if name == "History"));
        assert_eq!(store.deck_names(), vec!["Geo", "History"]);
        assert_eq!(store.deck("Geo"), Some(&geo_deck()));
    }

    #[test]
    fn rename_missing_deck_is_not_found() {
        let (mut store, _dir) = test_store();
        assert!(matches!(
            store.rename_deck("Geo", "Geography"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn autosave_suppression_defers_writes() {
        let (mut store, _dir) = test_store();
        store.set_autosave(false);
        store.add_deck(geo_deck()).unwrap();
        assert!(!store.path().exists());

        store.save().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn import_accepts_wrapped_and_bare_shapes() {
        let (mut store, dir) = test_store();
        let wrapped = dir.path().join("wrapped.json");
        let bare = dir.path().join("bare.json");
        fs::write(
            &wrapped,
            r#"{"version": 1, "deck": {"name": "Wrapped", "tag": "", "cards": []}}"#,
        )
        .unwrap();
        fs::write(&bare, r#"{"name": "Bare", "tag": "", "cards": []}"#).unwrap();

        assert_eq!(store.import_deck(&wrapped).unwrap(), "Wrapped");
        assert_eq!(store.import_deck(&bare).unwrap(), "Bare");
    }

    #[test]
    fn import_blank_name_uses_placeholder() {
        let (mut store, dir) = test_store();
        let file = dir.path().join("deck.json");
        fs::write(&file, r#"{"deck": {"name": "   ", "cards": []}}"#).unwrap();
        assert_eq!(store.import_deck(&file).unwrap(), "Imported Deck");
    }

    #[test]
    fn import_collision_appends_smallest_unused_suffix() {
        let (mut store, dir) = test_store();
        store.add_deck(geo_deck()).unwrap();

        let file = dir.path().join("geo.json");
        fs::write(
            &file,
            r#"{"deck": {"name": "Geo", "tag": "x", "cards": [{"question": "Capital of France?", "answer": "Paris"}]}}"#,
        )
        .unwrap();

        assert_eq!(store.import_deck(&file).unwrap(), "Geo (2)");
        assert_eq!(store.import_deck(&file).unwrap(), "Geo (3)");
        assert_eq!(store.deck_names(), vec!["Geo", "Geo (2)", "Geo (3)"]);

        // A freed suffix is reused before probing higher.
        store.remove_deck("Geo (2)").unwrap();
        assert_eq!(store.import_deck(&file).unwrap(), "Geo (2)");
    }

    #[test]
    fn import_rejects_invalid_json() {
        let (mut store, dir) = test_store();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{{{").unwrap();
        assert!(matches!(store.import_deck(&file), Err(StoreError::Parse(_))));
    }

    #[test]
    fn export_then_import_round_trips() {
        let (mut store, dir) = test_store();
        store.add_deck(geo_deck()).unwrap();

        let file = dir.path().join("geo-export.json");
        store.export_deck("Geo", &file).unwrap();

        let (mut other, _other_dir) = test_store();
        assert_eq!(other.import_deck(&file).unwrap(), "Geo");
        assert_eq!(other.deck("Geo"), Some(&geo_deck()));
    }

    #[test]
    fn export_missing_deck_is_not_found() {
        let (store, dir) = test_store();
        let file = dir.path().join("nope.json");
        assert!(matches!(
            store.export_deck("Geo", &file),
            Err(StoreError::NotFound(_))
        ));
        assert!(!file.exists());
    }

    #[test]
    fn export_all_writes_whole_collection() {
        let (mut store, dir) = test_store();
        store.add_deck(geo_deck()).unwrap();
        store.add_deck(Deck::new("History", "school")).unwrap();

        let file = dir.path().join("all.json");
        store.export_all(&file).unwrap();

        let mut reloaded = DeckStore::new(&file);
        let report = reloaded.load().unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(reloaded.deck("Geo"), Some(&geo_deck()));
    }
}
