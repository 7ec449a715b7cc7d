//! Persisted app configuration (API key, model, STT endpoint).

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User configuration. The API key is base64-encoded at rest (obfuscation,
/// not encryption).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base64-encoded chat API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Chat completion model name.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Chat completions endpoint URL.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
    /// Speech-to-text endpoint URL (OpenAI-compatible audio/transcriptions).
    #[serde(default = "default_stt_url")]
    pub stt_url: String,
    /// Speech-to-text model name.
    #[serde(default = "default_stt_model")]
    pub stt_model: String,
    /// Base64-encoded STT API key, when the STT service needs its own.
    #[serde(default)]
    pub stt_api_key: Option<String>,
    /// Target language code for recognition (e.g. "es" or "es-ES").
    #[serde(default = "default_language")]
    pub language: String,
    /// Segment length in seconds.
    #[serde(default = "default_segment_length")]
    pub segment_length_secs: f64,
}

fn default_chat_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_chat_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_stt_url() -> String {
    "https://api.groq.com/openai/v1/audio/transcriptions".to_string()
}

fn default_stt_model() -> String {
    "whisper-large-v3".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_segment_length() -> f64 {
    60.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_chat_model(),
            chat_url: default_chat_url(),
            stt_url: default_stt_url(),
            stt_model: default_stt_model(),
            stt_api_key: None,
            language: default_language(),
            segment_length_secs: default_segment_length(),
        }
    }
}

impl AppConfig {
    pub fn set_api_key(&mut self, key: &str) {
        self.api_key = Some(encode_key(key));
    }

    pub fn set_stt_api_key(&mut self, key: &str) {
        self.stt_api_key = Some(encode_key(key));
    }

    /// Decoded chat API key, if one is stored.
    pub fn api_key(&self) -> Option<String> {
        self.api_key.as_deref().and_then(decode_key)
    }

    /// Decoded STT API key, falling back to the chat key when unset.
    pub fn stt_api_key(&self) -> Option<String> {
        self.stt_api_key
            .as_deref()
            .and_then(decode_key)
            .or_else(|| self.api_key())
    }
}

fn encode_key(key: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(key.trim())
}

fn decode_key(encoded: &str) -> Option<String> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<Option<AppConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let config: AppConfig = serde_json::from_str(&json).map_err(|e| e.to_string())?;
    Ok(Some(config))
}
