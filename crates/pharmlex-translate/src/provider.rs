//! Translation provider boundary and the HTTP implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use pharmlex_core::{Error, Language, Result, TranslationConfig};

/// External translation service.
///
/// Implementations may fail; the overlay absorbs every failure. No retry
/// contract is required.
pub trait TranslationProvider: Send + Sync {
    fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// LibreTranslate-compatible HTTP provider.
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    /// Build a client with the configured per-request timeout. A timed-out
    /// call surfaces as an error and the overlay falls back to the source
    /// text.
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl TranslationProvider for HttpTranslator {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let mut body = json!({
            "q": text,
            "source": source.code(),
            "target": target.code(),
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        debug!("Translating {} chars {} -> {}", text.len(), source, target);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!("API error {}: {}", status, body)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("Malformed response: {}", e)))?;
        parsed["translatedText"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Translation("Response missing translatedText".into()))
    }
}
