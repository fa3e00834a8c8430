// src/lib.rs

pub mod core;
pub mod error;
pub mod persistence;
pub mod reload;
pub mod session;
pub mod stores;

pub use crate::core::aggregate::DictionaryAggregate;
pub use crate::core::lexicon::Lexicon;
pub use crate::core::ngram::NgramContext;
pub use crate::core::source::{DictionarySource, StaticDictionary, SuggestedWord, SuggestionSink};
pub use crate::error::{DictError, Result};
pub use crate::persistence::DictionaryPersister;
pub use crate::reload::{ReloadPolicy, ReloadableDictionary};
pub use crate::session::TraversalSessionHandle;
