use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SyncError};
use crate::model::id_to_string;

/// Fixture id -> id of the block currently reserving it, persisted as a flat JSON object.
///
/// An entry exists only while its block exists on the calendar. The whole map
/// is rewritten on every flush.
#[derive(Debug, Clone)]
pub struct Mapping {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Mapping {
    /// Read the mapping file. A missing file is an empty mapping (first run);
    /// its directory must exist.
    #[instrument(level = "info", skip_all)]
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "No mapping file; every fixture will get a new block");
                return Ok(Self { path, entries: BTreeMap::new() });
            }
            Err(e) => return Err(SyncError::Mapping(format!("read {}: {}", path.display(), e))),
        };

        let raw: BTreeMap<String, serde_json::Value> = if body.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&body)
                .map_err(|e| SyncError::Mapping(format!("parse {}: {}", path.display(), e)))?
        };
        let entries = raw
            .into_iter()
            .map(|(fixture_id, block_id)| {
                id_to_string(&block_id)
                    .map(|b| (fixture_id.clone(), b))
                    .ok_or_else(|| SyncError::Mapping(format!("entry {} has unusable block id {}", fixture_id, block_id)))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        info!(entries = entries.len(), path = %path.display(), "Loaded mapping");
        Ok(Self { path, entries })
    }

    /// In-memory mapping bound to `path`; nothing is read.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), entries: BTreeMap::new() }
    }

    pub fn get(&self, fixture_id: &str) -> Option<&str> {
        self.entries.get(fixture_id).map(String::as_str)
    }

    /// Record the block for a fixture, returning the id it replaced.
    pub fn insert(&mut self, fixture_id: &str, block_id: &str) -> Option<String> {
        self.entries.insert(fixture_id.to_string(), block_id.to_string())
    }

    /// Forget a fixture's block, returning the id that was recorded.
    pub fn remove(&mut self, fixture_id: &str) -> Option<String> {
        self.entries.remove(fixture_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail unless the next `flush` can write next to the mapping file.
    pub fn check_writable(&self) -> Result<()> {
        let tmp = self.tmp_path();
        fs::write(&tmp, b"")
            .and_then(|_| fs::remove_file(&tmp))
            .map_err(|e| SyncError::Mapping(format!("{} is not writable: {}", self.path.display(), e)))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Write every entry to disk. The file is replaced atomically via a sibling temp file.
    pub fn flush(&self) -> Result<()> {
        let body = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| SyncError::Mapping(format!("serialize: {}", e)))?;

        let tmp = self.tmp_path();
        fs::write(&tmp, body).map_err(|e| SyncError::Mapping(format!("write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| SyncError::Mapping(format!("replace {}: {}", self.path.display(), e)))?;
        debug!(entries = self.entries.len(), path = %self.path.display(), "Flushed mapping");
        Ok(())
    }
}
