// File: src/session.rs
use crate::core::ngram::NgramContext;
use crate::error::{DictError, Result};
use std::sync::Arc;
use tracing::warn;

/// Handle value meaning "no native session held".
pub const NOT_A_SESSION: u64 = 0;

/// Boundary to the native search engine's session allocator. `create` must
/// return a non-zero handle; `release` must tolerate being handed a handle
/// it already released (the wrapper normally prevents that, the backend is
/// the second line of defense).
pub trait TraversalBackend: Send + Sync {
    fn create(&self, locale: &str, dict_size_hint: usize) -> Result<u64>;
    fn init(&self, handle: u64, dict_ptr: u64, previous_word: Option<&str>) -> Result<()>;
    fn release(&self, handle: u64);
}

/// Owns exactly one native traversal session.
///
/// Move-only: the handle is never shared between concurrent queries; each
/// concurrent traversal creates its own session. `release` is the contract;
/// the `Drop` impl is a last-resort safety net whose timing is unspecified
/// and which must never be the primary release path.
pub struct TraversalSessionHandle {
    backend: Arc<dyn TraversalBackend>,
    handle: u64,
}

impl TraversalSessionHandle {
    /// Allocates a new native session for the given locale and dictionary
    /// size hint.
    pub fn create(
        backend: Arc<dyn TraversalBackend>,
        locale: &str,
        dict_size_hint: usize,
    ) -> Result<Self> {
        let handle = backend.create(locale, dict_size_hint)?;
        if handle == NOT_A_SESSION {
            return Err(DictError::Session(format!(
                "backend returned the null session handle for locale '{locale}'"
            )));
        }
        Ok(Self { backend, handle })
    }

    /// (Re)binds the session to a dictionary and previous-word context.
    /// Replaces any prior binding, so one session is reusable across queries
    /// without the realloc cost. Fails on a released handle.
    pub fn init(&mut self, dict_ptr: u64, context: &NgramContext) -> Result<()> {
        if !self.is_held() {
            return Err(DictError::Session(
                "init called on a released traversal session".into(),
            ));
        }
        self.backend.init(self.handle, dict_ptr, context.previous_word())
    }

    pub fn is_held(&self) -> bool {
        self.handle != NOT_A_SESSION
    }

    /// Raw handle for the external search call. Valid only while held.
    pub fn raw(&self) -> u64 {
        self.handle
    }

    /// Releases the native session and parks the handle at the "not held"
    /// sentinel. Releasing twice is a no-op.
    pub fn release(&mut self) {
        if self.handle != NOT_A_SESSION {
            self.backend.release(self.handle);
            self.handle = NOT_A_SESSION;
        }
    }
}

impl Drop for TraversalSessionHandle {
    fn drop(&mut self) {
        if self.is_held() {
            warn!(handle = self.handle, "traversal session dropped without explicit release");
            self.release();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    /// In-process backend that tracks live sessions so tests can assert
    /// no leak and no double release.
    #[derive(Default)]
    pub struct CountingBackend {
        next: AtomicU64,
        pub releases: AtomicUsize,
        /// handle -> (dict_ptr, previous word) of the latest init
        pub bindings: Mutex<HashMap<u64, (u64, Option<String>)>>,
    }

    impl CountingBackend {
        pub fn live_sessions(&self) -> usize {
            self.bindings.lock().len()
        }
    }

    impl TraversalBackend for CountingBackend {
        fn create(&self, _locale: &str, _dict_size_hint: usize) -> Result<u64> {
            let handle = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            self.bindings.lock().insert(handle, (0, None));
            Ok(handle)
        }

        fn init(&self, handle: u64, dict_ptr: u64, previous_word: Option<&str>) -> Result<()> {
            let mut bindings = self.bindings.lock();
            match bindings.get_mut(&handle) {
                Some(slot) => {
                    *slot = (dict_ptr, previous_word.map(str::to_owned));
                    Ok(())
                }
                None => Err(DictError::Session("init on unknown handle".into())),
            }
        }

        fn release(&self, handle: u64) {
            self.releases.fetch_add(1, Ordering::SeqCst);
            self.bindings.lock().remove(&handle);
        }
    }
}
