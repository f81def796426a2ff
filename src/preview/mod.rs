//! Preview rendering and share links.
//!
//! Extracted pages are written to a preview file on disk and addressed by a
//! `file://` URL, the terminal analogue of an object URL: the previous
//! preview is a weak reference and is deleted as soon as a newer one
//! supersedes it. A tag-stripped text rendering of the same page feeds the
//! TUI preview pane. Share links are self-contained `data:` URLs carrying
//! the percent-encoded document.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::utils::strip_ansi_codes;

// Mirrors encodeURIComponent: everything but alphanumerics and a small
// unreserved set is escaped
const SHARE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script regex compiles")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style regex compiles")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex compiles"));

/// Owns the on-disk preview files for one session
pub struct PreviewManager {
    dir: PathBuf,
    current: Option<PathBuf>,
}

impl PreviewManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), current: None }
    }

    /// Write `html` as the preview for the given entry id, revoking the
    /// previous preview file, and return the new file's path
    pub fn render(&mut self, entry_id: &str, html: &str) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create previews directory: {}", self.dir.display())
            })?;
        }

        let path = self.dir.join(format!("page-{}.html", entry_id));
        fs::write(&path, html)
            .with_context(|| format!("Failed to write preview file: {}", path.display()))?;

        self.revoke();
        self.current = Some(path.clone());
        Ok(path)
    }

    /// `file://` URL of the current preview, if one has been rendered
    pub fn current_url(&self) -> Option<String> {
        self.current.as_deref().map(file_url)
    }

    /// Delete the superseded preview file, best-effort
    fn revoke(&mut self) {
        if let Some(old) = self.current.take()
            && let Err(e) = fs::remove_file(&old)
        {
            eprintln!("Warning: failed to remove old preview {}: {}", old.display(), e);
        }
    }
}

impl Drop for PreviewManager {
    fn drop(&mut self) {
        self.revoke();
    }
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Build a self-contained share URL for a generated document.
/// Only standalone HTML qualifies; anything else is rejected before a link
/// that cannot render is handed out.
pub fn share_url(html: &str) -> Result<String> {
    if !html.contains("<!DOCTYPE html>") && !html.contains("<html") {
        bail!("Content is not a standalone HTML document");
    }
    let encoded = utf8_percent_encode(html, SHARE_ENCODE_SET).to_string();
    Ok(format!("data:text/html,{}", encoded))
}

/// Render HTML as plain text for the terminal preview pane.
///
/// Scripts and styles are dropped, tags stripped, the common entities
/// decoded, and control sequences removed so model output cannot drive the
/// terminal.
pub fn render_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");
    let stripped = TAG_RE.replace_all(&without_styles, "");

    let decoded = decode_entities(&stripped);
    let sanitized = strip_ansi_codes(&decoded);

    // Collapse runs of blank lines left behind by stripped blocks
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for line in sanitized.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            lines.push("");
        } else {
            blank_run = 0;
            lines.push(trimmed);
        }
    }

    lines.join("\n").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
