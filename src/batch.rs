//! Atomic write batches
//!
//! Puts and deletes queued here are applied by the engine all at once via
//! `Database::write_batch`. Within one batch the last operation on a key wins.

/// A set of writes applied atomically
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    inner: sled::Batch,
    ops: usize,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an upsert
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> &mut Self {
        self.inner.insert(key, value);
        self.ops += 1;
        self
    }

    /// Queue a delete (absent keys are fine)
    pub fn delete(&mut self, key: &[u8]) -> &mut Self {
        self.inner.remove(key);
        self.ops += 1;
        self
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops == 0
    }

    pub(crate) fn into_inner(self) -> sled::Batch {
        self.inner
    }
}
