//! Store persistence: load/save with atomic writes

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{HistoryEntry, Version};

pub const STORE_VERSION: u32 = 1;
pub const STORE_FILENAME: &str = "history.json";

/// On-disk shape of the combined history/version store
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: u32,
    pub entries: Vec<HistoryEntry>,
    pub versions: Vec<Version>,
    #[serde(default)]
    pub current_index: Option<usize>,
}

/// Load the persisted store from `data_dir`.
/// Returns None if the file is missing or from an incompatible version
/// (caller starts fresh); corrupt JSON is an error the caller may degrade on.
pub fn load_store(data_dir: &Path) -> Result<Option<StoreFile>> {
    let path = data_dir.join(STORE_FILENAME);
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read store file: {}", path.display()))?;
    let file: StoreFile = serde_json::from_str(&json).context("Failed to parse store JSON")?;

    if file.version != STORE_VERSION {
        eprintln!(
            "Store version mismatch (expected {}, found {}), starting fresh",
            STORE_VERSION, file.version
        );
        return Ok(None);
    }

    Ok(Some(file))
}

/// Save the store atomically (temp file + rename)
pub fn save_store(data_dir: &Path, file: &StoreFile) -> Result<()> {
    if !data_dir.exists() {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    }

    let path = data_dir.join(STORE_FILENAME);
    let temp = data_dir.join(format!("{}.tmp", STORE_FILENAME));

    let json = serde_json::to_string_pretty(file).context("Failed to serialize store")?;
    fs::write(&temp, json).context("Failed to write store temp file")?;
    fs::rename(&temp, &path).context("Failed to rename store temp file")?;

    Ok(())
}
