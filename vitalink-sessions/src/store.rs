//! Durable append-only log of finalized sessions

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::SessionRecord;

/// Append-only durable log of [`SessionRecord`]s.
///
/// The durable representation is a single JSON array, rewritten on every
/// append via write-temp / fsync / rename so a crash mid-write never leaves
/// a torn document. The in-memory cache is the read side and is updated
/// only after the durable write succeeds, so the cache never holds a record
/// the disk does not.
///
/// Appends are serialized by an interior lock; share the store as an `Arc`
/// between the single-writer pipeline and read-only query handlers.
pub struct SessionStore {
    path: PathBuf,
    records: Mutex<Vec<SessionRecord>>,
}

impl SessionStore {
    /// Open the store, loading the full log into the read cache.
    ///
    /// A missing or empty file yields an empty log. Content that cannot be
    /// read or parsed is treated as empty rather than fatal; the next
    /// append overwrites it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let records = Self::load_records(&path);
        info!(
            "Session log {} loaded with {} record(s)",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn load_records(path: &Path) -> Vec<SessionRecord> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(
                    "Session log {} unreadable, starting empty: {}",
                    path.display(),
                    e
                );
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Session log {} corrupt, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Durably append one record.
    ///
    /// On failure the cache is untouched and the error propagates to the
    /// caller; the previous on-disk document is still intact because the
    /// rename never happened.
    pub fn append(&self, record: SessionRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();

        let mut next = records.clone();
        next.push(record);
        self.write_document(&next)?;

        *records = next;
        Ok(())
    }

    /// Snapshot of the log in append order.
    ///
    /// Not live: callers re-read to observe later appends.
    pub fn read_all(&self) -> Vec<SessionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full document to a sibling temp file and rename it over
    /// the log path.
    fn write_document(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
