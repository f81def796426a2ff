//! Local tool functions the normalizer can dispatch to.
//!
//! When a response carries a tool/function-call descriptor instead of text,
//! the call is resolved against this fixed registry: a date lookup, a
//! city-keyed weather lookup, and a mock website browse. Tool failures never
//! propagate; every dispatched call resolves to a string so normalization
//! stays infallible.

use std::time::Duration;

use chrono::Local;
use reqwest::blocking::Client;
use serde_json::Value;

const WEATHER_TIMEOUT_SECS: u64 = 10;

/// Tool-call resolution, injectable so tests can substitute a mock
pub trait ToolDispatch {
    /// Run the named tool with JSON-encoded arguments.
    /// `None` means the tool is unknown or the arguments are unusable;
    /// the caller then falls back to dumping the raw response.
    fn dispatch(&self, name: &str, arguments: &str) -> Option<String>;
}

/// The built-in tool set
pub struct ToolRegistry {
    http: Client,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(WEATHER_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { http }
    }

    fn current_date(&self) -> String {
        Local::now().format("%A, %B %-d, %Y").to_string()
    }

    fn weather(&self, city: &str) -> String {
        let url = format!("https://wttr.in/{}?format=3", city);
        match self.http.get(&url).send().and_then(|r| r.error_for_status()) {
            Ok(response) => match response.text() {
                Ok(report) => report.trim().to_string(),
                Err(_) => format!("Weather for {} is currently unavailable.", city),
            },
            Err(_) => format!("Weather for {} is currently unavailable.", city),
        }
    }

    fn browse(&self, url: &str) -> String {
        // Mock browse: the terminal client does not fetch arbitrary pages
        format!(
            "Summary of {}: a landing page with a navigation bar, hero section, \
             and footer. (Mock browse result; live fetching is not performed.)",
            url
        )
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatch for ToolRegistry {
    fn dispatch(&self, name: &str, arguments: &str) -> Option<String> {
        let args: Value = serde_json::from_str(arguments).unwrap_or(Value::Null);

        match name {
            "current_date" | "get_current_date" => Some(self.current_date()),
            "get_weather" => {
                let city = args.get("city").and_then(Value::as_str)?;
                Some(self.weather(city))
            }
            "browse_website" => {
                let url = args.get("url").and_then(Value::as_str)?;
                Some(self.browse(url))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_date_dispatch() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch("current_date", "{}").unwrap();
        // Format is "Weekday, Month D, YYYY"
        assert!(result.contains(','));
        assert!(result.len() > 10);
    }

    #[test]
    fn test_unknown_tool_returns_none() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.dispatch("launch_rocket", "{}"), None);
    }

    #[test]
    fn test_weather_without_city_returns_none() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.dispatch("get_weather", "{}"), None);
        assert_eq!(registry.dispatch("get_weather", "not json"), None);
    }

    #[test]
    fn test_browse_website_is_mocked() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch("browse_website", r#"{"url":"https://example.com"}"#);
        let text = result.unwrap();
        assert!(text.contains("https://example.com"));
        assert!(text.contains("Mock browse"));
    }
}
