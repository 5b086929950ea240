//! kvhandle CLI
//!
//! Opens a store directory, runs one command against it and closes it.

use clap::{Parser, Subcommand};
use kvhandle::{Config, Database, KvError};
use tracing_subscriber::{fmt, EnvFilter};

/// kvhandle CLI
#[derive(Parser, Debug)]
#[command(name = "kvhandle-cli")]
#[command(about = "Inspect and edit a kvhandle store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./kvhandle_data")]
    data_dir: String,

    /// Engine cache size in MB
    #[arg(short = 'c', long, default_value = "64")]
    cache_mb: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List pairs in key order
    Scan {
        /// Only keys starting with this prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Stop after this many pairs
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show store statistics
    Stats,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvhandle=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let cache_capacity = match cache_bytes(args.cache_mb) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .cache_capacity(cache_capacity)
        .build();

    let db = match Database::open(config) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = run(&db, args.command);

    // Close even when the command failed, then report the first error
    let closed = db.close();

    match outcome.and(closed) {
        Ok(()) => {}
        Err(KvError::NotFound) => {
            eprintln!("(not found)");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Convert `--cache-mb` to bytes, rejecting values that overflow
fn cache_bytes(mb: u64) -> kvhandle::Result<u64> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| KvError::Config(format!("--cache-mb {} is too large", mb)))
}

fn run(db: &Database, command: Commands) -> kvhandle::Result<()> {
    match command {
        Commands::Get { key } => {
            let value = db.get(key.as_bytes())?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::Put { key, value } => {
            db.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            db.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::Scan { prefix, limit } => {
            let iter = match prefix {
                Some(prefix) => db.scan_prefix(prefix.as_bytes())?,
                None => db.iter()?,
            };

            for item in iter.take(limit.unwrap_or(usize::MAX)) {
                let (key, value) = item?;
                println!(
                    "{}\t{}",
                    String::from_utf8_lossy(&key),
                    String::from_utf8_lossy(&value)
                );
            }
        }
        Commands::Stats => {
            println!("path:         {}", db.path().display());
            println!("keys:         {}", db.len()?);
            println!("size_on_disk: {}", db.size_on_disk()?);
            println!("recovered:    {}", db.was_recovered()?);
        }
    }

    Ok(())
}
