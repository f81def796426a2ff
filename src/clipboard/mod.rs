use anyhow::{Context, Result};
use arboard::Clipboard;

/// Maximum clipboard payload (10MB); generated pages and share URLs past
/// this size are rejected rather than handed to the OS clipboard
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Trait for clipboard operations (allows mocking in tests)
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Real clipboard implementation using arboard
struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

#[cfg(test)]
fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)?;
    Ok(())
}

/// Copy text to the system clipboard.
///
/// Used for the "copy page content" and "copy share URL" actions.
///
/// # Errors
/// Returns error if:
/// - Text is empty or larger than 10MB
/// - Clipboard access is denied or unavailable (headless environment)
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    // Validate first, before initializing clipboard (for better error messages in CI)
    validate_clipboard_text(text)?;

    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock clipboard for testing without system clipboard access
    struct MockClipboard {
        text: Option<String>,
        should_fail: bool,
    }

    impl MockClipboard {
        fn new() -> Self {
            Self { text: None, should_fail: false }
        }

        fn with_failure() -> Self {
            Self { text: None, should_fail: true }
        }
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.should_fail {
                anyhow::bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_page_content_with_mock() {
        let mut mock = MockClipboard::new();
        let html = "<!DOCTYPE html>\n<html><body>hi</body></html>";

        copy_with_provider(html, &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some(html));
    }

    #[test]
    fn test_copy_unicode_with_mock() {
        let mut mock = MockClipboard::new();
        let text = "généré 🚀 页面";

        copy_with_provider(text, &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some(text));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut mock = MockClipboard::with_failure();
        let result = copy_with_provider("content", &mut mock);
        assert!(result.unwrap_err().to_string().contains("Mock clipboard error"));
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut mock = MockClipboard::new();
        let err = copy_with_provider("", &mut mock).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_oversized_text_rejected() {
        let mut mock = MockClipboard::new();
        let huge = "a".repeat(MAX_CLIPBOARD_SIZE + 1);
        let err = copy_with_provider(&huge, &mut mock).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let mut mock = MockClipboard::new();
        let at_limit = "a".repeat(MAX_CLIPBOARD_SIZE);
        assert!(copy_with_provider(&at_limit, &mut mock).is_ok());
    }

    #[test]
    fn test_validation_happens_before_clipboard_init() {
        // Invalid input must fail validation, not clipboard setup
        let err = copy_to_clipboard("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
