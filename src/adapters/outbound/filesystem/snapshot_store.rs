use crate::adapters::outbound::memory::{StoreSnapshot, SNAPSHOT_VERSION};
use crate::shared::error::RiskError;
use crate::shared::security::validate_snapshot_file;
use crate::shared::Result;
use anyhow::Context;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// SnapshotStore adapter for persisting the whole store as one JSON document
///
/// Saves go to a temporary file in the same directory which is then renamed
/// over the target, so a crash mid-write never leaves a truncated snapshot.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, or `None` when no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<StoreSnapshot>> {
        match fs::symlink_metadata(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_error(format!("Failed to read metadata: {}", e))),
            Ok(_) => {}
        }

        validate_snapshot_file(&self.path, "load")?;

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot {}", self.path.display()))?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", self.path.display()))?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(self.storage_error(format!(
                "Snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let parent = self.parent_directory();
        if !parent.is_dir() {
            return Err(self.storage_error(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )));
        }

        if fs::symlink_metadata(&self.path).is_ok() {
            validate_snapshot_file(&self.path, "save")?;
        }

        let temp = NamedTempFile::new_in(parent)
            .map_err(|e| self.storage_error(format!("Failed to create temporary file: {}", e)))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, snapshot)
                .map_err(|e| self.storage_error(format!("Failed to serialize snapshot: {}", e)))?;
            writer
                .flush()
                .map_err(|e| self.storage_error(format!("Failed to write snapshot: {}", e)))?;
        }
        temp.persist(&self.path)
            .map_err(|e| self.storage_error(format!("Failed to replace snapshot: {}", e.error)))?;

        Ok(())
    }

    fn parent_directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        }
    }

    fn storage_error(&self, details: String) -> anyhow::Error {
        RiskError::Storage {
            path: self.path.clone(),
            details,
        }
        .into()
    }
}
