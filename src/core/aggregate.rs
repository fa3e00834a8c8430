// File: src/core/aggregate.rs
use crate::core::ngram::NgramContext;
use crate::core::source::{DictionarySource, SuggestionSink};
use crate::error::{DictError, Result};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, warn};

type MemberList = Vec<Arc<dyn DictionarySource>>;

/// Composes an ordered set of dictionary sources behind one query surface
/// and fans every query out to all of them.
///
/// The member list is published as an immutable snapshot: readers pin the
/// current snapshot for the duration of one query, writers replace the whole
/// list. A query that started before `add_dictionary` completes against the
/// snapshot it pinned; queries starting afterwards see the new member.
pub struct DictionaryAggregate {
    members: ArcSwap<MemberList>,
}

impl DictionaryAggregate {
    pub fn new() -> Self {
        Self {
            members: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn with_members(members: impl IntoIterator<Item = Arc<dyn DictionarySource>>) -> Self {
        Self {
            members: ArcSwap::from_pointee(members.into_iter().collect()),
        }
    }

    /// Appends a source. Safe while other threads are mid-query; in-flight
    /// queries keep their pinned snapshot and may not see the new member.
    pub fn add_dictionary(&self, source: Arc<dyn DictionarySource>) {
        debug!(dict_type = source.dict_type(), "adding dictionary member");
        self.members.rcu(|current| {
            let mut next = current.as_ref().clone();
            next.push(Arc::clone(&source));
            next
        });
    }

    pub fn member_count(&self) -> usize {
        self.members.load().len()
    }

    /// Logical OR across all members. Deliberately not short-circuited:
    /// a member query may have side effects (lazy reload), so every member
    /// is asked on every call.
    pub fn is_valid_word(&self, word: &str) -> bool {
        let snapshot = self.members.load();
        let mut valid = false;
        for member in snapshot.iter() {
            if member.is_valid_word(word) {
                valid = true;
            }
        }
        valid
    }

    /// Fans the suggestion query to every member; each appends into the
    /// shared sink. No de-duplication or re-ranking happens here.
    pub fn get_suggestions(
        &self,
        composed: &str,
        context: &NgramContext,
        sink: &mut dyn SuggestionSink,
    ) {
        let snapshot = self.members.load();
        for member in snapshot.iter() {
            member.get_suggestions(composed, context, sink);
        }
    }

    pub fn get_bigrams(&self, context: &NgramContext, sink: &mut dyn SuggestionSink) {
        let snapshot = self.members.load();
        for member in snapshot.iter() {
            member.get_bigrams(context, sink);
        }
    }

    /// Closes every member. A failing member never prevents the remaining
    /// members from closing; failures are surfaced only after all were
    /// attempted. Idempotent: the member list is swapped out first, so a
    /// second close sees no members.
    pub fn close(&self) -> Result<()> {
        let members = self.members.swap(Arc::new(Vec::new()));
        let total = members.len();
        let mut failed = 0usize;
        for member in members.iter() {
            if let Err(err) = member.close() {
                warn!(dict_type = member.dict_type(), %err, "dictionary member failed to close");
                failed += 1;
            }
        }
        if failed == 0 {
            Ok(())
        } else {
            Err(DictError::CloseFanout { failed, total })
        }
    }
}

impl Default for DictionaryAggregate {
    fn default() -> Self {
        Self::new()
    }
}
