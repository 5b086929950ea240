//! Configuration for kvhandle
//!
//! Centralized configuration with sensible defaults. Everything here is
//! handed straight to the engine; the handle keeps no tuning of its own.

use std::path::PathBuf;

use crate::error::{KvError, Result};

/// Main configuration for a kvhandle database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the store. Its contents belong to the engine.
    pub data_dir: PathBuf,

    /// Remove the store when the last handle to it is dropped
    pub temporary: bool,

    /// Fail to open if a store already exists at `data_dir`
    pub create_new: bool,

    // -------------------------------------------------------------------------
    // Engine Tuning
    // -------------------------------------------------------------------------
    /// Engine page cache size (in bytes)
    pub cache_capacity: u64,

    /// Background flush period (milliseconds), `None` disables it
    pub flush_every_ms: Option<u64>,

    /// Space/throughput trade-off used by the engine
    pub mode: StoreMode,
}

/// Engine storage mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Favor a small on-disk footprint
    LowSpace,

    /// Favor write throughput at the cost of more space
    HighThroughput,
}

impl From<StoreMode> for sled::Mode {
    fn from(mode: StoreMode) -> Self {
        match mode {
            StoreMode::LowSpace => sled::Mode::LowSpace,
            StoreMode::HighThroughput => sled::Mode::HighThroughput,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./kvhandle_data"),
            temporary: false,
            create_new: false,
            cache_capacity: 64 * 1024 * 1024, // 64 MB
            flush_every_ms: Some(500),
            mode: StoreMode::LowSpace,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings the engine would otherwise reject late or silently
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(KvError::Config("cache_capacity must be non-zero".into()));
        }

        if self.flush_every_ms == Some(0) {
            return Err(KvError::Config(
                "flush_every_ms must be non-zero (use None to disable)".into(),
            ));
        }

        if !self.temporary && self.data_dir.as_os_str().is_empty() {
            return Err(KvError::Config("data_dir must not be empty".into()));
        }

        Ok(())
    }

    /// Translate into the engine's own configuration
    pub fn to_engine(&self) -> sled::Config {
        let config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .flush_every_ms(self.flush_every_ms)
            .mode(self.mode.into())
            .temporary(self.temporary)
            .create_new(self.create_new);

        // A temporary store with no directory gets an engine-chosen location
        if self.temporary && self.data_dir.as_os_str().is_empty() {
            config
        } else {
            config.path(&self.data_dir)
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root of the store)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Remove the store on drop
    pub fn temporary(mut self, temporary: bool) -> Self {
        self.config.temporary = temporary;
        self
    }

    /// Refuse to open an existing store
    pub fn create_new(mut self, create_new: bool) -> Self {
        self.config.create_new = create_new;
        self
    }

    /// Set the engine cache capacity (in bytes)
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.config.cache_capacity = bytes;
        self
    }

    /// Set the background flush period (milliseconds)
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.config.flush_every_ms = ms;
        self
    }

    /// Set the engine storage mode
    pub fn mode(mut self, mode: StoreMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
