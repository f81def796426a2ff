//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;

use ai_page_studio::HistoryStore;
use tempfile::TempDir;

/// Environment variable the binary honors for data-dir isolation
pub const DATA_DIR_ENV: &str = "AI_PAGE_STUDIO_DATA_DIR";

/// A complete standalone page with the given title and body
pub fn sample_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>{}</body>\n</html>",
        title, body
    )
}

/// Builder for seeding an isolated studio data directory
pub struct StudioDirBuilder {
    temp_dir: TempDir,
}

impl StudioDirBuilder {
    pub fn new() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Record one generated page in the store
    pub fn with_page(self, title: &str, body: &str) -> Self {
        let mut store = HistoryStore::load_or_default(self.temp_dir.path());
        store.append(&sample_page(title, body));
        self
    }

    /// Record raw non-HTML text in the store
    pub fn with_raw_entry(self, text: &str) -> Self {
        let mut store = HistoryStore::load_or_default(self.temp_dir.path());
        store.append(text);
        self
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}
