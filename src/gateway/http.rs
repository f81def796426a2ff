use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde_json::{Value, json};

use super::{AiGateway, ChatRequest};

const ENDPOINT_ENV: &str = "AI_PAGE_STUDIO_ENDPOINT";
const API_KEY_ENV: &str = "AI_PAGE_STUDIO_API_KEY";

/// Connect timeout only; the request itself has no deadline, matching the
/// await-with-no-timeout behavior of the gateway contract.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Gateway connection settings from flags and environment
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl GatewayConfig {
    /// Resolve config: explicit values win over environment variables
    pub fn resolve(endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.or_else(|| env::var(ENDPOINT_ENV).ok()).filter(|e| !e.is_empty()),
            api_key: api_key.or_else(|| env::var(API_KEY_ENV).ok()).filter(|k| !k.is_empty()),
        }
    }
}

/// Blocking HTTP gateway speaking an OpenAI-style chat-completions contract
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpGateway {
    /// Build a gateway from resolved config.
    ///
    /// A missing endpoint is the "gateway unavailable" condition and is
    /// reported here, before any network traffic.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let Some(endpoint) = config.endpoint else {
            bail!(
                "AI gateway is not configured. Set {} or pass --endpoint with a \
                 chat-completions URL.",
                ENDPOINT_ENV
            );
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, endpoint, api_key: config.api_key })
    }
}

impl AiGateway for HttpGateway {
    fn chat(&self, request: &ChatRequest) -> Result<Value> {
        let body = json!({
            "model": request.model,
            "messages": request.messages,
        });

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .with_context(|| format!("AI gateway is unreachable at {}", self.endpoint))?;

        let status = response.status();
        let value: Value = response
            .json()
            .with_context(|| format!("AI gateway returned a non-JSON response ({})", status))?;

        if !status.is_success() {
            bail!("AI gateway returned {}: {}", status, value);
        }

        Ok(value)
    }
}
