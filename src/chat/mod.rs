//! Chat with an AI assistant about the transcript, plus run summaries.

mod client;
mod memory;

pub use client::{ChatClient, ChatConfig, Summarizer};
pub use memory::ConversationMemory;
