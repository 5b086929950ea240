//! # kvhandle
//!
//! A thin handle over an embedded, ordered key-value engine:
//! - Open (or create) a directory-backed store
//! - Point reads, writes and deletes on opaque byte keys/values
//! - Lazy ordered iteration with deterministic cursor release
//! - Atomic write batches
//! - Explicit close; every later operation fails cleanly
//!
//! The storage engine itself (log-structured storage, compaction,
//! durability, ordering) is [`sled`]. Nothing here reimplements it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Caller / kvhandle-cli                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Database                             │
//! │            (path + RwLock<Option<connection>>)              │
//! └──────────┬──────────────────┬───────────────────┬───────────┘
//!            │                  │                   │
//!            ▼                  ▼                   ▼
//!     ┌─────────────┐    ┌─────────────┐     ┌─────────────┐
//!     │ point ops   │    │   KvIter    │     │ WriteBatch  │
//!     └──────┬──────┘    └──────┬──────┘     └──────┬──────┘
//!            └──────────────────┼───────────────────┘
//!                               ▼
//!                        ┌─────────────┐
//!                        │    sled     │
//!                        └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvhandle::Database;
//!
//! # fn main() -> kvhandle::Result<()> {
//! let db = Database::open_path("./data")?;
//! db.put(b"a", b"1")?;
//! db.put(b"b", b"2")?;
//!
//! for item in db.iter()? {
//!     let (key, value) = item?;
//!     println!("{:?} = {:?}", key, value);
//! }
//!
//! db.delete(b"a")?;
//! assert!(db.get(b"a").unwrap_err().is_not_found());
//! db.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod batch;
pub mod iter;
pub mod database;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use batch::WriteBatch;
pub use config::{Config, StoreMode};
pub use database::Database;
pub use error::{KvError, Result};
pub use iter::KvIter;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvhandle
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
