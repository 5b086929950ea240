//! Database Module
//!
//! The handle that owns one connection to the engine and forwards every
//! operation to it.
//!
//! ## Responsibilities
//! - Open (or create) the store directory through the engine
//! - Forward get/put/delete/iteration/batches to the engine unchanged
//! - Surface every engine error to the caller without retrying
//! - Refuse all operations once closed

use std::ops::RangeBounds;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::batch::WriteBatch;
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::iter::KvIter;

/// An open handle to an embedded ordered key-value store
///
/// ## Lifecycle: open → operational → closed
///
/// - `open` establishes the connection or fails with `KvError::Open`
/// - every other operation reads the connection slot
/// - `close` takes the connection out of the slot; from then on every
///   operation returns `KvError::Closed`
///
/// ## Concurrency
///
/// The engine does its own locking. The `RwLock` here only guards the
/// connection slot, so readers never block each other and `close` waits for
/// in-flight operations to finish. Cursors outlive a single call, so they are
/// counted instead; `close` fails with `KvError::CursorsOpen` while any exist.
pub struct Database {
    /// Engine configuration used for open
    config: Config,

    /// Store directory
    path: PathBuf,

    /// Connection to the engine, `None` after close
    conn: RwLock<Option<sled::Db>>,

    /// Number of live `KvIter` values
    cursors: Arc<AtomicUsize>,
}

impl Database {
    /// Open or create a database with the given config
    pub fn open(config: Config) -> Result<Self> {
        tracing::debug!("Opening database at {}", config.data_dir.display());

        config.validate()?;

        let db = config.to_engine().open().map_err(|source| {
            tracing::warn!("Open failed for {}: {}", config.data_dir.display(), source);
            KvError::Open {
                path: config.data_dir.clone(),
                source,
            }
        })?;

        tracing::debug!(
            recovered = db.was_recovered(),
            "Database opened at {}",
            config.data_dir.display()
        );

        Ok(Self {
            path: config.data_dir.clone(),
            config,
            conn: RwLock::new(Some(db)),
            cursors: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().data_dir(path.as_ref()).build();
        Self::open(config)
    }

    /// Run `f` against the live connection
    fn with_conn<T>(&self, f: impl FnOnce(&sled::Db) -> Result<T>) -> Result<T> {
        let guard = self.conn.read();
        match guard.as_ref() {
            Some(db) => f(db),
            None => Err(KvError::Closed),
        }
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Upsert a value for a key
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        tracing::trace!(value_len = value.len(), "put {}", preview(key));
        self.with_conn(|db| {
            db.insert(key, value).map_err(|e| engine_error("put", e))?;
            Ok(())
        })
    }

    /// Get the value stored for a key
    ///
    /// Returns `KvError::NotFound` when the key has no value.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        tracing::trace!("get {}", preview(key));
        self.with_conn(|db| match db.get(key).map_err(|e| engine_error("get", e))? {
            Some(value) => Ok(value.to_vec()),
            None => {
                tracing::trace!("get {}: not found", preview(key));
                Err(KvError::NotFound)
            }
        })
    }

    /// Check whether a key currently has a value
    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        tracing::trace!("contains_key {}", preview(key));
        self.with_conn(|db| db.contains_key(key).map_err(|e| engine_error("contains_key", e)))
    }

    /// Delete a key
    ///
    /// Deleting an absent key is not an error.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        tracing::trace!("delete {}", preview(key));
        self.with_conn(|db| {
            db.remove(key).map_err(|e| engine_error("delete", e))?;
            Ok(())
        })
    }

    /// Apply every operation in the batch atomically
    pub fn write_batch(&self, batch: WriteBatch) -> Result<()> {
        tracing::debug!("Applying batch of {} operations", batch.len());
        self.with_conn(|db| {
            db.apply_batch(batch.into_inner())
                .map_err(|e| engine_error("write_batch", e))
        })
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Iterate over all pairs in ascending key order
    ///
    /// The cursor is released when the returned iterator is dropped.
    pub fn iter(&self) -> Result<KvIter> {
        tracing::trace!("iter");
        self.with_conn(|db| {
            Ok(KvIter::new(db.iter(), Arc::clone(&self.cursors)))
        })
    }

    /// Iterate over the pairs whose keys fall inside `range`
    pub fn range<'k, R>(&self, range: R) -> Result<KvIter>
    where
        R: RangeBounds<&'k [u8]>,
    {
        tracing::trace!("range");
        self.with_conn(|db| {
            Ok(KvIter::new(db.range(range), Arc::clone(&self.cursors)))
        })
    }

    /// Iterate over the pairs whose keys start with `prefix`
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<KvIter> {
        tracing::trace!("scan_prefix {}", preview(prefix));
        self.with_conn(|db| {
            Ok(KvIter::new(db.scan_prefix(prefix), Arc::clone(&self.cursors)))
        })
    }

    /// Visit every pair in ascending key order
    ///
    /// Returns the number of pairs visited. Stops at the first iteration
    /// error and returns it; the cursor is released on every exit path.
    pub fn read_all<F>(&self, mut visit: F) -> Result<usize>
    where
        F: FnMut(&[u8], &[u8]),
    {
        tracing::debug!("read_all");
        let mut visited = 0;
        for item in self.iter()? {
            let (key, value) = item?;
            visit(key.as_slice(), value.as_slice());
            visited += 1;
        }
        tracing::debug!("read_all visited {} pairs", visited);
        Ok(visited)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Flush buffered writes to disk, returning the number of bytes flushed
    pub fn flush(&self) -> Result<usize> {
        self.with_conn(|db| {
            let bytes = db.flush().map_err(|e| engine_error("flush", e))?;
            tracing::debug!("Flushed {} bytes", bytes);
            Ok(bytes)
        })
    }

    /// Number of live keys (walks the whole store)
    pub fn len(&self) -> Result<usize> {
        tracing::trace!("len");
        self.with_conn(|db| Ok(db.len()))
    }

    /// True when the store holds no keys
    pub fn is_empty(&self) -> Result<bool> {
        tracing::trace!("is_empty");
        self.with_conn(|db| Ok(db.is_empty()))
    }

    /// Bytes the engine currently occupies on disk
    pub fn size_on_disk(&self) -> Result<u64> {
        tracing::trace!("size_on_disk");
        self.with_conn(|db| db.size_on_disk().map_err(|e| engine_error("size_on_disk", e)))
    }

    /// Whether open found an existing store rather than creating one
    pub fn was_recovered(&self) -> Result<bool> {
        tracing::trace!("was_recovered");
        self.with_conn(|db| Ok(db.was_recovered()))
    }

    /// Close the database
    ///
    /// Flushes outstanding writes and releases the connection, which frees
    /// the store for another open. Calling any operation afterwards,
    /// including a second `close`, returns `KvError::Closed`.
    ///
    /// Fails with `KvError::CursorsOpen` and leaves the handle open while any
    /// `KvIter` from this handle is still alive.
    pub fn close(&self) -> Result<()> {
        tracing::debug!("Closing database at {}", self.path.display());

        let db = {
            let mut conn = self.conn.write();

            // New cursors are only created under the read lock
            let live = self.cursors.load(Ordering::Acquire);
            if conn.is_some() && live > 0 {
                tracing::warn!(
                    "Close refused for {}: {} open cursor(s)",
                    self.path.display(),
                    live
                );
                return Err(KvError::CursorsOpen(live));
            }

            conn.take().ok_or(KvError::Closed)?
        };

        // The connection is gone even if this flush fails
        db.flush().map_err(|e| {
            tracing::warn!("Flush on close failed for {}: {}", self.path.display(), e);
            KvError::Close(e)
        })?;

        tracing::debug!("Database at {} closed", self.path.display());
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the store directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once `close` has succeeded
    pub fn is_closed(&self) -> bool {
        self.conn.read().is_none()
    }

    /// Number of `KvIter` values from this handle that are still alive
    pub fn open_cursors(&self) -> usize {
        self.cursors.load(Ordering::Acquire)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Wrap an engine failure, logging which operation hit it
fn engine_error(op: &str, e: sled::Error) -> KvError {
    tracing::warn!("{} failed: {}", op, e);
    KvError::Io(e)
}

/// Printable form of a key for log lines
fn preview(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}
