use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable that overrides the platform data directory.
/// Primarily for tests and sandboxed environments.
const DATA_DIR_ENV: &str = "AI_PAGE_STUDIO_DATA_DIR";

/// Get the application data directory, creating it if missing.
///
/// Resolution order: `AI_PAGE_STUDIO_DATA_DIR`, then the platform data
/// directory (e.g. `~/.local/share/ai-page-studio`).
pub fn get_data_dir() -> Result<PathBuf> {
    let dir = match env::var(DATA_DIR_ENV) {
        Ok(overridden) if !overridden.is_empty() => PathBuf::from(overridden),
        _ => dirs::data_dir()
            .context("Failed to resolve platform data directory")?
            .join("ai-page-studio"),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    }

    Ok(dir)
}

/// Directory that holds rendered preview files, under the data directory
pub fn get_previews_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?.join("previews");
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create previews directory: {}", dir.display()))?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_env_override() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("studio-data");

        // SAFETY: Setting environment variables in tests is safe as long as:
        // 1. Tests touching this variable restore it afterwards
        // 2. No other threads read it concurrently
        let original = env::var(DATA_DIR_ENV).ok();
        unsafe {
            env::set_var(DATA_DIR_ENV, &target);
        }

        let result = get_data_dir();

        unsafe {
            match original {
                Some(v) => env::set_var(DATA_DIR_ENV, v),
                None => env::remove_var(DATA_DIR_ENV),
            }
        }

        let dir = result.unwrap();
        assert_eq!(dir, target);
        assert!(dir.exists());
    }

    #[test]
    fn test_previews_dir_is_nested_under_data_dir() {
        let temp = tempfile::TempDir::new().unwrap();

        let original = env::var(DATA_DIR_ENV).ok();
        unsafe {
            env::set_var(DATA_DIR_ENV, temp.path());
        }

        let result = get_previews_dir();

        unsafe {
            match original {
                Some(v) => env::set_var(DATA_DIR_ENV, v),
                None => env::remove_var(DATA_DIR_ENV),
            }
        }

        let dir = result.unwrap();
        assert!(dir.ends_with("previews"));
        assert!(dir.exists());
    }
}
