//! Tests for diagnostic events
//!
//! Every handle operation emits a tracing event; these tests capture the
//! formatted output of a scoped subscriber and look for each one.

use std::io;
use std::sync::{Arc, Mutex};

use kvhandle::{Config, Database};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<String> {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(captured.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    captured.lines()
}

// =============================================================================
// Event Tests
// =============================================================================

#[test]
fn test_every_query_operation_logs() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path().join("db"))
        .flush_every_ms(None)
        .build();
    let db = Database::open(config).unwrap();
    db.put(b"key", b"value").unwrap();

    let lines = capture(|| {
        db.contains_key(b"key").unwrap();
        db.len().unwrap();
        db.is_empty().unwrap();
        db.size_on_disk().unwrap();
        db.was_recovered().unwrap();
    });

    let logged = |suffix: &str| lines.iter().any(|line| line.ends_with(suffix));

    assert!(logged(" contains_key key"));
    assert!(logged(" len"));
    assert!(logged(" is_empty"));
    assert!(logged(" size_on_disk"));
    assert!(logged(" was_recovered"));
}

#[test]
fn test_close_logs_only_its_own_path() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");
    let db = Database::open_path(&data_dir).unwrap();

    let lines = capture(|| db.close().unwrap());

    let expected = format!("Database at {} closed", data_dir.display());
    assert!(lines.iter().any(|line| line.ends_with(&expected)));
}
