//! History and version logs with undo/redo.
//!
//! Every successful generation appends a [`HistoryEntry`]; versions are a
//! separate log written only by an explicit save action. Undo/redo move a
//! cursor over the history array without modifying it. Persistence is
//! fire-and-forget: every mutation schedules a best-effort write, and a
//! failed write warns on stderr instead of failing the operation.

pub mod persistence;

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::extractor::page_display_name;
use crate::models::{HistoryEntry, Version};
use persistence::StoreFile;

/// Project names are truncated to this many characters before the
/// uniqueness suffix is attached
const PROJECT_NAME_MAX_CHARS: usize = 30;

/// Total bytes of stored page content before the oldest entries are trimmed
const MAX_HISTORY_BYTES: usize = 5 * 1024 * 1024;

const UNTITLED_PROJECT: &str = "Untitled Page";

pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    versions: Vec<Version>,
    current_index: Option<usize>,
    data_dir: PathBuf,
}

impl HistoryStore {
    /// Open the store at `data_dir`, falling back to an empty store when the
    /// file is missing, unreadable, or from an incompatible version
    pub fn load_or_default(data_dir: &Path) -> Self {
        let file = match persistence::load_store(data_dir) {
            Ok(Some(file)) => file,
            Ok(None) => StoreFile::default(),
            Err(e) => {
                eprintln!("Warning: failed to load history store: {:#}", e);
                StoreFile::default()
            }
        };

        let mut store = Self {
            entries: file.entries,
            versions: file.versions,
            current_index: file.current_index,
            data_dir: data_dir.to_path_buf(),
        };
        store.clamp_index();
        store
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current_index.and_then(|i| self.entries.get(i))
    }

    /// Append one generation cycle. The project name is derived from the
    /// page `<title>` (else first `<h1>`), truncated, and suffixed with a
    /// timestamp for uniqueness.
    pub fn append(&mut self, content: &str) -> &HistoryEntry {
        let project_name = derive_project_name(content);
        let entry = HistoryEntry::new(content, Some(project_name));
        self.entries.push(entry);
        self.current_index = Some(self.entries.len() - 1);
        self.trim_to_budget();
        self.persist();
        // trim keeps the entry just appended
        let index = self.current_index.unwrap_or(0);
        &self.entries[index]
    }

    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        let renamed = match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.project_name = Some(new_name.to_string());
                true
            }
            None => false,
        };
        if renamed {
            self.persist();
        }
        renamed
    }

    pub fn set_description(&mut self, id: &str, description: &str) -> bool {
        let updated = match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.description = Some(description.to_string());
                true
            }
            None => false,
        };
        if updated {
            self.persist();
        }
        updated
    }

    /// Record where the entry's preview file landed
    pub fn set_preview_path(&mut self, id: &str, path: &Path) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.preview_path = Some(path.to_path_buf());
            self.persist();
        }
    }

    /// Move the cursor to an arbitrary entry
    pub fn select(&mut self, index: usize) -> Option<&HistoryEntry> {
        if index >= self.entries.len() {
            return None;
        }
        self.current_index = Some(index);
        self.persist();
        self.entries.get(index)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current_index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.current_index, Some(i) if i + 1 < self.entries.len())
    }

    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        let index = self.current_index? - 1;
        self.current_index = Some(index);
        self.persist();
        self.entries.get(index)
    }

    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        let index = self.current_index? + 1;
        self.current_index = Some(index);
        self.persist();
        self.entries.get(index)
    }

    /// Explicitly save a version snapshot, independent of history
    pub fn save_version(
        &mut self,
        content: &str,
        description: &str,
        model_used: Option<String>,
    ) -> &Version {
        let project_name = page_display_name(content);
        let version = Version::new(content, description, project_name, model_used);
        self.versions.push(version);
        self.persist();
        let index = self.versions.len() - 1;
        &self.versions[index]
    }

    /// Drop oldest entries while stored content exceeds the byte budget.
    /// Entries are never deleted individually, only bulk-trimmed here.
    fn trim_to_budget(&mut self) {
        while self.entries.len() > 1 && self.content_bytes() > MAX_HISTORY_BYTES {
            self.entries.remove(0);
            self.current_index = self.current_index.map(|i| i.saturating_sub(1));
        }
    }

    fn content_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.content.len()).sum()
    }

    fn clamp_index(&mut self) {
        if self.entries.is_empty() {
            self.current_index = None;
        } else if let Some(i) = self.current_index
            && i >= self.entries.len()
        {
            self.current_index = Some(self.entries.len() - 1);
        }
    }

    /// Fire-and-forget write. There is no transactional guarantee between
    /// the in-memory state and the persisted copy.
    fn persist(&self) {
        let file = StoreFile {
            version: persistence::STORE_VERSION,
            entries: self.entries.clone(),
            versions: self.versions.clone(),
            current_index: self.current_index,
        };
        if let Err(e) = persistence::save_store(&self.data_dir, &file) {
            eprintln!("Warning: failed to persist history: {:#}", e);
        }
    }
}

/// Derive the display project name for freshly generated content
fn derive_project_name(content: &str) -> String {
    let base = page_display_name(content).unwrap_or_else(|| UNTITLED_PROJECT.to_string());
    let truncated: String = base.chars().take(PROJECT_NAME_MAX_CHARS).collect();
    format!("{}-{}", truncated.trim_end(), Utc::now().format("%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = HistoryStore::load_or_default(dir.path());
        (dir, store)
    }

    fn page(title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        )
    }

    #[test]
    fn test_append_sets_cursor_to_newest() {
        let (_dir, mut store) = temp_store();
        store.append(&page("One", "a"));
        store.append(&page("Two", "b"));

        assert_eq!(store.entries().len(), 2);
        assert_eq!(store.current_index(), Some(1));
        assert!(store.current().unwrap().content.contains("Two"));
    }

    #[test]
    fn test_project_name_from_title_with_timestamp_suffix() {
        let (_dir, mut store) = temp_store();
        let entry = store.append(&page("Portfolio Site", "x"));
        let name = entry.project_name.clone().unwrap();
        assert!(name.starts_with("Portfolio Site-"));
        // Suffix is six digits (HHMMSS)
        let suffix = name.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_project_name_from_h1_when_no_title() {
        let (_dir, mut store) = temp_store();
        let html = "<html><body><h1>Hero Heading</h1></body></html>";
        let entry = store.append(html);
        assert!(entry.project_name.clone().unwrap().starts_with("Hero Heading-"));
    }

    #[test]
    fn test_project_name_untitled_fallback() {
        let (_dir, mut store) = temp_store();
        let entry = store.append("<html><body><p>nothing named</p></body></html>");
        assert!(entry.project_name.clone().unwrap().starts_with(UNTITLED_PROJECT));
    }

    #[test]
    fn test_project_name_truncated_to_limit() {
        let (_dir, mut store) = temp_store();
        let long_title = "A".repeat(80);
        let entry = store.append(&page(&long_title, "x"));
        let name = entry.project_name.clone().unwrap();
        let base = name.rsplit_once('-').unwrap().0;
        assert_eq!(base.chars().count(), PROJECT_NAME_MAX_CHARS);
    }

    #[test]
    fn test_rename_and_describe() {
        let (_dir, mut store) = temp_store();
        let id = store.append(&page("Old", "x")).id.clone();

        assert!(store.rename(&id, "New Name"));
        assert!(store.set_description(&id, "the good one"));

        let entry = &store.entries()[0];
        assert_eq!(entry.project_name.as_deref(), Some("New Name"));
        assert_eq!(entry.description.as_deref(), Some("the good one"));
    }

    #[test]
    fn test_rename_unknown_id_is_false() {
        let (_dir, mut store) = temp_store();
        assert!(!store.rename("no-such-id", "x"));
        assert!(!store.set_description("no-such-id", "x"));
    }

    #[test]
    fn test_undo_redo_walk_the_cursor() {
        let (_dir, mut store) = temp_store();
        for i in 0..4 {
            store.append(&page(&format!("P{}", i), "x"));
        }

        assert!(store.undo().unwrap().content.contains("P2"));
        assert!(store.undo().unwrap().content.contains("P1"));
        assert!(store.redo().unwrap().content.contains("P2"));
        assert_eq!(store.current_index(), Some(2));
    }

    #[test]
    fn test_undo_redo_bounds() {
        let (_dir, mut store) = temp_store();
        assert!(store.undo().is_none());
        assert!(store.redo().is_none());

        store.append(&page("Only", "x"));
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(store.undo().is_none());
        assert!(store.redo().is_none());
        assert_eq!(store.current_index(), Some(0));
    }

    #[test]
    fn test_undo_then_redos_restore_exact_index() {
        let (_dir, mut store) = temp_store();
        for i in 0..5 {
            store.append(&page(&format!("P{}", i), "x"));
        }
        // N=5 appends, undo x3, redo x2 -> index 3
        for _ in 0..3 {
            assert!(store.undo().is_some());
        }
        for _ in 0..2 {
            assert!(store.redo().is_some());
        }

        assert_eq!(store.current_index(), Some(3));
        assert!(store.current().unwrap().content.contains("P3"));
    }

    #[test]
    fn test_select_by_index() {
        let (_dir, mut store) = temp_store();
        store.append(&page("A", "x"));
        store.append(&page("B", "x"));

        assert!(store.select(0).unwrap().content.contains("A"));
        assert_eq!(store.current_index(), Some(0));
        assert!(store.select(9).is_none());
    }

    #[test]
    fn test_versions_are_independent_of_history() {
        let (_dir, mut store) = temp_store();
        store.append(&page("A", "x"));
        store.save_version(&page("A", "x"), "before edits", Some("gpt-4o-mini".to_string()));
        store.save_version(&page("A", "y"), "after edits", None);

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.versions().len(), 2);
        assert_eq!(store.versions()[0].description, "before edits");
        assert_eq!(store.versions()[1].model_used.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_trim_drops_oldest_when_over_budget() {
        let (_dir, mut store) = temp_store();
        // Three entries of ~2MB each overflow the 5MB budget
        let big_body = "x".repeat(2 * 1024 * 1024);
        store.append(&page("First", &big_body));
        store.append(&page("Second", &big_body));
        store.append(&page("Third", &big_body));

        assert_eq!(store.entries().len(), 2);
        assert!(store.entries()[0].content.contains("Second"));
        assert_eq!(store.current_index(), Some(1));
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let id;
        {
            let mut store = HistoryStore::load_or_default(dir.path());
            store.append(&page("Persisted", "x"));
            id = store.entries()[0].id.clone();
        }

        let reloaded = HistoryStore::load_or_default(dir.path());
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].id, id);
        assert_eq!(reloaded.current_index(), Some(0));
    }

    #[test]
    fn test_corrupted_store_degrades_to_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(persistence::STORE_FILENAME), "not json at all").unwrap();

        let store = HistoryStore::load_or_default(dir.path());
        assert!(store.entries().is_empty());
        assert_eq!(store.current_index(), None);
    }
}
