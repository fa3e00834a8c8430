// File: src/stores.rs
use crate::core::lexicon::Lexicon;
use crate::error::Result;
use crate::persistence::read_lexicon;
use crate::reload::ContentStore;
use serde::Deserialize;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Change marker for a file-backed store: hash of (mtime, len). Good enough
/// to notice a rewritten file; a missing file maps to a constant so the
/// reload path gets a clean error from `load` instead of thrashing.
fn file_version(path: &Path) -> u64 {
    let Ok(meta) = fs::metadata(path) else {
        return 0;
    };
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    meta.len().hash(&mut hasher);
    if let Ok(mtime) = meta.modified() {
        if let Ok(since_epoch) = mtime.duration_since(UNIX_EPOCH) {
            since_epoch.as_nanos().hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Backing store reading the binary dictionary file the persister writes.
/// Pairing this with a [`crate::reload::ReloadableDictionary`] closes the
/// persist/reload round trip.
pub struct BinaryDictStore {
    path: PathBuf,
}

impl BinaryDictStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentStore for BinaryDictStore {
    fn version(&self) -> u64 {
        file_version(&self.path)
    }

    fn load(&self) -> Result<Lexicon> {
        read_lexicon(&self.path)
    }
}

/// One entry of a JSON word list: word, frequency, and the words it is
/// commonly followed by.
#[derive(Debug, Deserialize)]
struct WordListEntry {
    word: String,
    #[serde(default = "default_frequency")]
    frequency: u64,
    #[serde(default)]
    followed_by: Vec<(String, u64)>,
}

fn default_frequency() -> u64 {
    1
}

/// Backing store reading a serde_json word list, the stand-in for external
/// providers such as the contacts or user-word databases.
pub struct JsonWordListStore {
    path: PathBuf,
}

impl JsonWordListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentStore for JsonWordListStore {
    fn version(&self) -> u64 {
        file_version(&self.path)
    }

    fn load(&self) -> Result<Lexicon> {
        let bytes = fs::read(&self.path)?;
        let entries: Vec<WordListEntry> = serde_json::from_slice(&bytes)?;
        let mut lexicon = Lexicon::new();
        for entry in entries {
            lexicon.insert_unigram(entry.word.clone(), entry.frequency);
            for (next, freq) in entry.followed_by {
                lexicon.insert_bigram(entry.word.clone(), next, freq);
            }
        }
        Ok(lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::DictionarySource;
    use crate::reload::{ReloadableDictionary, ReloadPolicy};
    use tempfile::tempdir;

    #[test]
    fn json_word_list_parses_frequencies_and_bigrams() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(
            &path,
            r#"[
                {"word": "Alice", "frequency": 12, "followed_by": [["Smith", 4]]},
                {"word": "Bob"}
            ]"#,
        )
        .unwrap();

        let lexicon = JsonWordListStore::new(&path).load().unwrap();
        assert_eq!(lexicon.frequency("Alice"), Some(12));
        assert_eq!(lexicon.frequency("Bob"), Some(1));
        assert_eq!(lexicon.successors_of("Alice").next(), Some(("Smith", 4)));
    }

    #[test]
    fn missing_file_loads_as_an_error_not_a_panic() {
        let store = JsonWordListStore::new("/nonexistent/contacts.json");
        assert!(store.load().is_err());
        // And a dictionary over it answers from its empty snapshot.
        let dict = ReloadableDictionary::new("contacts", ReloadPolicy::Synchronous, store);
        assert!(!dict.is_valid_word("Alice"));
    }

    #[test]
    fn rewriting_the_file_changes_the_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.json");
        fs::write(&path, r#"[{"word": "hello"}]"#).unwrap();
        let store = JsonWordListStore::new(&path);
        let before = store.version();
        fs::write(&path, r#"[{"word": "hello"}, {"word": "world"}]"#).unwrap();
        assert_ne!(store.version(), before);
    }
}
