//! Common Test Utilities
//!
//! Shared helpers for building document stores on disk. Stores are seeded
//! through a writable connection, then reopened read-only the way the CLI
//! opens them.

pub mod db_seeding;

/// Document store setup utilities
pub mod store {
    use dicom_bucket_audit::database::DocumentStore;
    use dicom_bucket_audit::errors::AppResult;
    use rusqlite::Connection;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// On-disk store in a temporary directory, removed on drop
    pub struct TestStore {
        _dir: TempDir,
        path: PathBuf,
    }

    impl TestStore {
        pub fn new() -> anyhow::Result<Self> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("dicom.db");
            Connection::open(&path)?;
            Ok(Self { _dir: dir, path })
        }

        /// Writable connection for seeding
        pub fn writer(&self) -> anyhow::Result<Connection> {
            Ok(Connection::open(&self.path)?)
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Read-only handle, as used by report runs
        pub fn open(&self) -> AppResult<DocumentStore> {
            DocumentStore::open_read_only(&self.path)
        }
    }
}
