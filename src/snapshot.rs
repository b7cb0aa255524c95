//! Whole-store persistence to a single file on disk.
//!
//! Grounded on the original gob-backed repo: create-the-file-if-absent on
//! startup, decode-on-open otherwise, persist the whole store after every
//! successful mutation. We improve on its direct in-place rewrite (a crash
//! mid-write there leaves a truncated file) with a temp-file-then-rename,
//! which is atomic on the same filesystem.

use crate::error::BookmakerError;
use crate::store::SnapshotData;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Serializes writes to the snapshot file so two concurrent persists can
/// never interleave their temp-file-and-rename sequences.
pub struct SnapshotWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Loads the snapshot at startup, creating an empty one if the file does
    /// not exist yet.
    pub fn load_or_create(&self) -> Result<SnapshotData, BookmakerError> {
        match File::open(&self.path) {
            Ok(file) => bincode::deserialize_from(BufReader::new(file))
                .map_err(|e| BookmakerError::internal(format!("snapshot file could not be decoded: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let data = SnapshotData::default();
                self.persist(&data)?;
                Ok(data)
            }
            Err(e) => Err(BookmakerError::internal(format!("snapshot file could not be opened: {e}"))),
        }
    }

    /// Writes `data` to a temp file beside the snapshot path, then renames it
    /// into place. The rename is the only step visible to a concurrent
    /// reader, so a crash mid-write never corrupts the on-disk snapshot.
    pub fn persist(&self, data: &SnapshotData) -> Result<(), BookmakerError> {
        let _guard = self.lock.lock();
        let tmp_path = tmp_path_for(&self.path);
        {
            let tmp_file = File::create(&tmp_path)
                .map_err(|e| BookmakerError::internal(format!("snapshot temp file could not be created: {e}")))?;
            bincode::serialize_into(BufWriter::new(tmp_file), data)
                .map_err(|e| BookmakerError::internal(format!("snapshot could not be encoded: {e}")))?;
        }
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| BookmakerError::internal(format!("snapshot file could not be renamed: {e}")))?;
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn creates_file_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let writer = SnapshotWriter::new(&path);
        let data = writer.load_or_create().unwrap();
        assert!(data.users.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn round_trips_through_persist_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let writer = SnapshotWriter::new(&path);
        writer.load_or_create().unwrap();

        let mut data = SnapshotData::default();
        data.users.push(User {
            name: "books/b1/users/u1".into(),
            username: "alice".into(),
            centipoints: 500,
            unsettled_centipoints: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        writer.persist(&data).unwrap();

        let reloaded = writer.load_or_create().unwrap();
        assert_eq!(reloaded.users.len(), 1);
        assert_eq!(reloaded.users[0].username, "alice");
    }

    #[test]
    fn no_leftover_temp_file_after_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let writer = SnapshotWriter::new(&path);
        writer.load_or_create().unwrap();
        writer.persist(&SnapshotData::default()).unwrap();
        assert!(!tmp_path_for(&path).exists());
    }
}
