//! Lazy ordered iteration
//!
//! `KvIter` owns one engine cursor. The cursor lives exactly as long as the
//! `KvIter` value, so breaking out of a loop, returning early with `?` or
//! unwinding from a panic all release it through `Drop`.
//!
//! Every live `KvIter` is counted on its `Database`; `close` refuses to run
//! while the count is non-zero, since the cursor pins the engine's file lock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{KvError, Result};

/// Iterator over key/value pairs in ascending key order
///
/// Yields `Err(KvError::Iteration)` at most once; after an error the iterator
/// is fused and only returns `None`.
pub struct KvIter {
    /// Engine cursor, `None` once exhausted or failed
    inner: Option<sled::Iter>,

    /// Pairs handed out so far (diagnostics only)
    yielded: usize,

    /// Live cursor count shared with the owning `Database`
    cursors: Arc<AtomicUsize>,
}

impl KvIter {
    /// Wrap an engine cursor; the caller must hold the connection read lock
    pub(crate) fn new(inner: sled::Iter, cursors: Arc<AtomicUsize>) -> Self {
        cursors.fetch_add(1, Ordering::AcqRel);
        Self {
            inner: Some(inner),
            yielded: 0,
            cursors,
        }
    }

    /// Number of pairs yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Collect only the keys, stopping at the first error
    pub fn keys(self) -> Result<Vec<Vec<u8>>> {
        self.map(|item| item.map(|(key, _)| key)).collect()
    }

    fn step(
        &mut self,
        item: Option<sled::Result<(sled::IVec, sled::IVec)>>,
    ) -> Option<<Self as Iterator>::Item> {
        match item {
            Some(Ok((key, value))) => {
                self.yielded += 1;
                Some(Ok((key.to_vec(), value.to_vec())))
            }
            Some(Err(e)) => {
                tracing::warn!("Iteration failed after {} pairs: {}", self.yielded, e);
                self.inner = None;
                Some(Err(KvError::Iteration(e)))
            }
            None => {
                self.inner = None;
                None
            }
        }
    }
}

impl Iterator for KvIter {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next();
        self.step(item)
    }
}

impl DoubleEndedIterator for KvIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next_back();
        self.step(item)
    }
}

impl std::iter::FusedIterator for KvIter {}

impl Drop for KvIter {
    fn drop(&mut self) {
        tracing::trace!("Releasing cursor after {} pairs", self.yielded);

        // The engine cursor must be gone before close can see a zero count
        drop(self.inner.take());
        self.cursors.fetch_sub(1, Ordering::AcqRel);
    }
}
