// File: src/reload.rs
use crate::core::lexicon::Lexicon;
use crate::core::ngram::NgramContext;
use crate::core::source::{DictionarySource, SuggestedWord, SuggestionSink};
use crate::error::Result;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Version sentinel meaning "nothing loaded yet"; the first query always
/// observes the dictionary as stale.
const NEVER_LOADED: u64 = u64::MAX;

/// Backing content provider for a dictionary whose contents change at
/// runtime (contacts, user words, a rewritten dictionary file).
///
/// `version` is an opaque change marker: any value different from the one
/// observed at the last successful load means the in-memory state is stale.
/// `load` must be callable from whatever thread runs the reload.
pub trait ContentStore: Send + Sync {
    fn version(&self) -> u64;
    fn load(&self) -> Result<Lexicon>;
}

/// How a query that finds its dictionary stale resolves the staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Block the calling query until the reload completes. For small, fast
    /// stores (contacts, user words) where answers must be fresh.
    Synchronous,
    /// Schedule the reload on a background thread and answer from the
    /// currently loaded (possibly stale) snapshot. For callers that need
    /// bounded latency more than freshness.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Reloading,
}

struct Inner {
    dict_type: String,
    policy: ReloadPolicy,
    store: Box<dyn ContentStore>,
    /// Mutual exclusion for the reload itself. A second caller arriving
    /// during a reload blocks here, then finds fresh state and skips the
    /// duplicate load.
    reload_lock: Mutex<()>,
    lexicon: RwLock<Arc<Lexicon>>,
    loaded_version: AtomicU64,
    marked_stale: AtomicBool,
    reloading: AtomicBool,
    closed: AtomicBool,
}

impl Inner {
    fn is_stale(&self) -> bool {
        self.marked_stale.load(Ordering::Acquire)
            || self.loaded_version.load(Ordering::Acquire) != self.store.version()
    }

    /// Runs one reload under the per-instance lock. On failure the state
    /// stays stale so the next query retries; the failure is logged, not
    /// surfaced to the query caller.
    fn reload(&self) {
        let _guard = self.reload_lock.lock();
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let target_version = self.store.version();
        if !self.marked_stale.load(Ordering::Acquire)
            && self.loaded_version.load(Ordering::Acquire) == target_version
        {
            // A reload that finished while we waited already got us here.
            return;
        }
        self.reloading.store(true, Ordering::Release);
        match self.store.load() {
            Ok(lexicon) => {
                debug!(
                    dict_type = %self.dict_type,
                    words = lexicon.unigram_count(),
                    "dictionary reloaded"
                );
                *self.lexicon.write() = Arc::new(lexicon);
                self.loaded_version.store(target_version, Ordering::Release);
                self.marked_stale.store(false, Ordering::Release);
            }
            Err(err) => {
                warn!(dict_type = %self.dict_type, %err, "dictionary reload failed, staying stale");
                self.marked_stale.store(true, Ordering::Release);
            }
        }
        self.reloading.store(false, Ordering::Release);
    }
}

/// A dictionary source whose contents track a mutable backing store.
///
/// Every query evaluates staleness before answering. Under the synchronous
/// policy the caller blocks until the content is fresh and is guaranteed to
/// read the reloaded state; under the deferred policy the reload is handed
/// to a background thread and the query answers from the current snapshot.
///
/// Clones share one instance; the reload state is per instance, so distinct
/// dictionaries never contend with each other.
#[derive(Clone)]
pub struct ReloadableDictionary {
    inner: Arc<Inner>,
}

impl ReloadableDictionary {
    pub fn new(
        dict_type: impl Into<String>,
        policy: ReloadPolicy,
        store: impl ContentStore + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                dict_type: dict_type.into(),
                policy,
                store: Box::new(store),
                reload_lock: Mutex::new(()),
                lexicon: RwLock::new(Arc::new(Lexicon::new())),
                loaded_version: AtomicU64::new(NEVER_LOADED),
                marked_stale: AtomicBool::new(false),
                reloading: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// External change notification (e.g. a content-observer callback).
    /// The next query will reload.
    pub fn mark_stale(&self) {
        self.inner.marked_stale.store(true, Ordering::Release);
    }

    pub fn freshness(&self) -> Freshness {
        if self.inner.reloading.load(Ordering::Acquire) {
            Freshness::Reloading
        } else if self.inner.is_stale() {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    /// Resolves staleness according to the policy, then returns the snapshot
    /// the query should answer from.
    fn fresh_enough_snapshot(&self) -> Arc<Lexicon> {
        let inner = &self.inner;
        if !inner.closed.load(Ordering::Acquire) && inner.is_stale() {
            match inner.policy {
                ReloadPolicy::Synchronous => inner.reload(),
                ReloadPolicy::Deferred => {
                    if !inner.reloading.load(Ordering::Acquire) {
                        let inner = Arc::clone(&self.inner);
                        thread::spawn(move || inner.reload());
                    }
                }
            }
        }
        inner.lexicon.read().clone()
    }
}

impl DictionarySource for ReloadableDictionary {
    fn dict_type(&self) -> &str {
        &self.inner.dict_type
    }

    fn is_valid_word(&self, word: &str) -> bool {
        if self.inner.closed.load(Ordering::Acquire) {
            return false;
        }
        self.fresh_enough_snapshot().contains(word)
    }

    fn get_suggestions(&self, composed: &str, _context: &NgramContext, sink: &mut dyn SuggestionSink) {
        if self.inner.closed.load(Ordering::Acquire) {
            return;
        }
        // Staleness is evaluated on every query, even one with nothing
        // composed yet, so the snapshot resolution comes first.
        let snapshot = self.fresh_enough_snapshot();
        if composed.is_empty() {
            return;
        }
        for (word, score) in snapshot.words_with_prefix(composed) {
            sink.push(SuggestedWord {
                word: word.to_string(),
                score,
                dict_type: self.inner.dict_type.clone(),
            });
        }
    }

    fn get_bigrams(&self, context: &NgramContext, sink: &mut dyn SuggestionSink) {
        if self.inner.closed.load(Ordering::Acquire) {
            return;
        }
        let Some(previous) = context.previous_word() else {
            return;
        };
        let snapshot = self.fresh_enough_snapshot();
        for (word, score) in snapshot.successors_of(previous) {
            sink.push(SuggestedWord {
                word: word.to_string(),
                score,
                dict_type: self.inner.dict_type.clone(),
            });
        }
    }

    fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        // Drop the loaded content; take the reload lock so we never race an
        // in-flight reload's write.
        let _guard = self.inner.reload_lock.lock();
        *self.inner.lexicon.write() = Arc::new(Lexicon::new());
        Ok(())
    }
}
