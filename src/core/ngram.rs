// File: src/core/ngram.rs

/// Immutable n-gram context for the word being composed: the previous word,
/// or the beginning-of-sentence marker.
///
/// Two distinct "empty" states exist and must not be conflated:
/// - beginning of sentence: previous word is the empty-string sentinel and
///   the flag is set (a usable context);
/// - cleared: no previous word at all, e.g. after a hard sentence-ending
///   separator (not a usable context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramContext {
    previous_word: Option<String>,
    beginning_of_sentence: bool,
}

impl NgramContext {
    /// The canonical "start of text" context.
    pub fn beginning_of_sentence() -> Self {
        Self {
            previous_word: Some(String::new()),
            beginning_of_sentence: true,
        }
    }

    /// Context following a committed word.
    pub fn with_previous_word(word: impl Into<String>) -> Self {
        Self {
            previous_word: Some(word.into()),
            beginning_of_sentence: false,
        }
    }

    /// Context after the previous word was externally cleared; `is_valid`
    /// reports false and bigram queries yield nothing.
    pub fn cleared() -> Self {
        Self {
            previous_word: None,
            beginning_of_sentence: false,
        }
    }

    /// True iff a previous-word field is present (beginning-of-sentence
    /// counts: its sentinel is the empty string, not absence).
    pub fn is_valid(&self) -> bool {
        self.previous_word.is_some()
    }

    pub fn is_beginning_of_sentence(&self) -> bool {
        self.beginning_of_sentence
    }

    pub fn previous_word(&self) -> Option<&str> {
        self.previous_word.as_deref()
    }
}
