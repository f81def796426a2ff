//! HTML extraction from raw model output.
//!
//! Model replies embed HTML in one of three shapes: a complete document, a
//! fenced code block, or a bare fragment mixed into prose. Extraction is a
//! first-match-wins cascade over those shapes; when only a fragment is found
//! it is wrapped in a minimal boilerplate document so the preview always
//! receives something standalone. No validation or sanitization is performed
//! on the extracted markup.

use std::sync::LazyLock;

use regex::Regex;

static FULL_DOCUMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!DOCTYPE\s+html.*?</html\s*>").expect("full-document regex compiles")
});

static FENCED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:html)?\s*(.*?)```").expect("fenced-block regex compiles")
});

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex compiles")
});

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("h1 regex compiles"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex compiles"));

/// Extract a standalone HTML document from model output.
///
/// Returns `None` when the text carries no HTML markers at all; the caller
/// is expected to show the raw text instead (an extraction miss is not
/// fatal). Only the first match is used when several candidates exist.
pub fn extract_html(text: &str) -> Option<String> {
    // 1. Complete document anywhere in the text
    if let Some(m) = FULL_DOCUMENT_RE.find(text) {
        return Some(m.as_str().trim().to_string());
    }

    // 2. First fenced code block
    if let Some(caps) = FENCED_BLOCK_RE.captures(text) {
        let inner = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if !inner.is_empty() {
            return Some(wrap_or_return(inner));
        }
    }

    // 3. Bare markup mixed into the text
    if text.contains("<html>") || text.contains("<body>") {
        return Some(wrap_or_return(text.trim()));
    }

    None
}

/// Extract a replacement fragment from model output.
///
/// Used by AI-driven selection edits, where the model is asked for only the
/// replacement snippet: unwraps the first fenced block when present, else
/// returns the trimmed text. Never wraps in a document.
pub fn extract_fragment(text: &str) -> String {
    if let Some(caps) = FENCED_BLOCK_RE.captures(text) {
        let inner = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if !inner.is_empty() {
            return inner.to_string();
        }
    }
    text.trim().to_string()
}

/// Derive a human-readable page name from `<title>`, falling back to the
/// first `<h1>`. Nested tags inside the heading are stripped.
pub fn page_display_name(html: &str) -> Option<String> {
    let raw = TITLE_RE
        .captures(html)
        .or_else(|| H1_RE.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())?;

    let name = TAG_RE.replace_all(raw, "").trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}

fn wrap_or_return(content: &str) -> String {
    if content.to_lowercase().contains("<!doctype") {
        content.to_string()
    } else {
        wrap_fragment(content)
    }
}

/// Wrap an HTML fragment in a minimal standalone document
fn wrap_fragment(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Generated Page</title>\n\
         </head>\n\
         <body>\n\
         {}\n\
         </body>\n\
         </html>",
        fragment
    )
}
