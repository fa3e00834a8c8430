// File: src/core/source.rs
use crate::core::lexicon::Lexicon;
use crate::core::ngram::NgramContext;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One candidate produced by a dictionary source. The score is the raw
/// source-local frequency; merging and re-ranking happen downstream in the
/// search engine, never in this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedWord {
    pub word: String,
    pub score: u64,
    /// Which source produced the candidate. Diagnostics only.
    pub dict_type: String,
}

/// Shared result sink a fan-out query appends into. Sources push candidates
/// directly; nothing de-duplicates at this level.
pub trait SuggestionSink {
    fn push(&mut self, suggestion: SuggestedWord);
}

impl SuggestionSink for Vec<SuggestedWord> {
    fn push(&mut self, suggestion: SuggestedWord) {
        Vec::push(self, suggestion);
    }
}

/// Capability contract every concrete dictionary implements: the static main
/// vocabulary, the contacts name list, the learned user words.
///
/// All methods take `&self` so one source can be shared across reader
/// threads; sources needing mutation (reload, learning) use interior
/// synchronization. `close` must be idempotent, and a closed source answers
/// every query negatively/empty rather than erroring.
pub trait DictionarySource: Send + Sync {
    /// Tag such as "main", "contacts", "user". Used only for diagnostics.
    fn dict_type(&self) -> &str;

    fn is_valid_word(&self, word: &str) -> bool;

    /// Appends every unigram candidate for the composed prefix to `sink`.
    fn get_suggestions(&self, composed: &str, context: &NgramContext, sink: &mut dyn SuggestionSink);

    /// Appends every bigram successor of the context's previous word to
    /// `sink`. An invalid context yields nothing.
    fn get_bigrams(&self, context: &NgramContext, sink: &mut dyn SuggestionSink);

    /// Releases the source's resources. Idempotent.
    fn close(&self) -> Result<()>;
}

/// The large static vocabulary: an immutable lexicon built once (typically
/// loaded from a persisted binary dictionary) and never reloaded.
pub struct StaticDictionary {
    dict_type: String,
    lexicon: Arc<Lexicon>,
    closed: AtomicBool,
}

impl StaticDictionary {
    pub fn new(dict_type: impl Into<String>, lexicon: Lexicon) -> Self {
        Self {
            dict_type: dict_type.into(),
            lexicon: Arc::new(lexicon),
            closed: AtomicBool::new(false),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl DictionarySource for StaticDictionary {
    fn dict_type(&self) -> &str {
        &self.dict_type
    }

    fn is_valid_word(&self, word: &str) -> bool {
        !self.is_closed() && self.lexicon.contains(word)
    }

    fn get_suggestions(&self, composed: &str, _context: &NgramContext, sink: &mut dyn SuggestionSink) {
        if self.is_closed() || composed.is_empty() {
            return;
        }
        for (word, score) in self.lexicon.words_with_prefix(composed) {
            sink.push(SuggestedWord {
                word: word.to_string(),
                score,
                dict_type: self.dict_type.clone(),
            });
        }
    }

    fn get_bigrams(&self, context: &NgramContext, sink: &mut dyn SuggestionSink) {
        if self.is_closed() {
            return;
        }
        let Some(previous) = context.previous_word() else {
            return;
        };
        for (word, score) in self.lexicon.successors_of(previous) {
            sink.push(SuggestedWord {
                word: word.to_string(),
                score,
                dict_type: self.dict_type.clone(),
            });
        }
    }

    fn close(&self) -> Result<()> {
        // Already-closed is a no-op, not an error.
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
