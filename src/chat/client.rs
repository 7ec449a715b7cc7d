//! OpenAI-compatible chat-completions client for chat and summarization.

use crate::chat::ConversationMemory;
use crate::error::ChatError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

const SYSTEM_PROMPT: &str = "You are a friendly conversational assistant that helps summarize \
and answer questions about audio transcriptions. Use markdown to format your answers when \
appropriate. Answer clearly and keep your responses well structured.";

const SUMMARY_PROMPT: &str = "You are an expert in analyzing transcriptions. Summarize the \
following audio transcription clearly and in a structured way. Include the key points, main \
topics, participants (if any) and any relevant conclusion. Use bullet points for the important \
items and, where possible, group them by topic. Keep the summary short (at most 10 lines) and \
easy to read for someone who did not hear the audio. If the text is very long, give a general \
summary and leave out irrelevant detail.";

/// Configuration for the remote text-completion service.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Full endpoint URL, e.g. https://api.groq.com/openai/v1/chat/completions.
    pub url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ChatConfig {
    pub fn new(url: String, model: String, api_key: String) -> Self {
        Self {
            url: url.trim().to_string(),
            model,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Anything that can turn a transcript into a short summary. The pipeline
/// depends on this seam rather than on a concrete client.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String, ChatError>;
}

/// Text-completion client with a system prompt and a bounded history window.
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChatError::Service { message: e.to_string() })?;
        Ok(Self { config, client })
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
        });
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Service { message: e.to_string() })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::from_service_message(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Service { message: e.to_string() })?;
        json.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ChatError::Service {
                message: "response carried no message content".to_string(),
            })
    }

    /// One chat turn: system prompt, the remembered exchanges, then
    /// `user_input`. The reply is recorded into `memory` on success.
    pub async fn chat(
        &self,
        memory: &mut ConversationMemory,
        user_input: &str,
    ) -> Result<String, ChatError> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        }];
        for exchange in memory.exchanges() {
            messages.push(ChatMessage {
                role: "user",
                content: exchange.user.clone(),
            });
            messages.push(ChatMessage {
                role: "assistant",
                content: exchange.assistant.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_input.to_string(),
        });

        let reply = self.complete(messages).await?;
        memory.record(user_input.to_string(), reply.clone());
        Ok(reply)
    }
}

#[async_trait]
impl Summarizer for ChatClient {
    /// Single-shot transcript summary. A context-length rejection surfaces as
    /// `ChatError::InputTooLong` so the caller can report "input too long to
    /// summarize" instead of a generic failure.
    async fn summarize(&self, transcript: &str) -> Result<String, ChatError> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: SUMMARY_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: transcript.to_string(),
            },
        ];
        self.complete(messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_the_configured_timeout() {
        let config = ChatConfig::new(
            "https://example.test/v1/chat/completions".to_string(),
            "llama3-8b-8192".to_string(),
            "key".to_string(),
        );
        assert!(ChatClient::new(config).is_ok());
    }
}
