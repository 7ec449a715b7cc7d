//! OpenAI-compatible transcription API backend (Whisper endpoints, Groq, open-asr-server, etc.)

use super::backend::SpeechBackend;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the remote transcription API.
#[derive(Debug, Clone)]
pub struct RemoteSttConfig {
    /// Full endpoint URL, e.g. https://api.groq.com/openai/v1/audio/transcriptions.
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Per-request timeout. A timeout counts as a service error for that
    /// segment; it never aborts the run.
    pub timeout: Duration,
}

impl RemoteSttConfig {
    pub fn new(url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            url: url.trim().to_string(),
            model,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Remote speech-to-text over multipart HTTP.
pub struct RemoteSttBackend {
    config: RemoteSttConfig,
    client: reqwest::Client,
}

impl RemoteSttBackend {
    pub fn new(config: RemoteSttConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SpeechBackend for RemoteSttBackend {
    fn name(&self) -> &'static str {
        "remote-api"
    }

    /// POST the whole segment as one request; the response is `{ "text": ... }`.
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String, String> {
        let bytes = std::fs::read(audio_path).map_err(|e| e.to_string())?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("audio/wav")
            .map_err(|e| e.to_string())?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());
        if !language.trim().is_empty() {
            form = form.text("language", language.trim().to_string());
        }

        let mut req = self.client.post(&self.config.url).multipart(form);
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, body));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        let text = json
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_url_and_defaults_timeout() {
        let config = RemoteSttConfig::new(
            "  https://example.test/v1/audio/transcriptions ".to_string(),
            "whisper-large-v3".to_string(),
            None,
        );
        assert_eq!(config.url, "https://example.test/v1/audio/transcriptions");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn backend_builds_with_the_configured_timeout() {
        let config = RemoteSttConfig::new(
            "https://example.test/v1/audio/transcriptions".to_string(),
            "whisper-large-v3".to_string(),
            Some("key".to_string()),
        );
        assert!(RemoteSttBackend::new(config).is_ok());
    }
}
