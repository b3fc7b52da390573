// src/models/gemini.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::relay::Message;

/// Body of a `models/<model>:generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Message,
    pub safety_settings: Vec<SafetySetting>,
    pub generation_config: GenerationConfig,
    pub contents: Vec<ContentEntry>,
}

/// An entry of `contents`. A caller conversation is sent as one nested entry
/// holding the whole list; the default prompt is sent as a plain message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentEntry {
    Conversation(Vec<Message>),
    Message(Message),
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub stop_sequences: Vec<&'static str>,
    pub response_mime_type: &'static str,
    pub response_modalities: Vec<&'static str>,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
    pub top_p: f64,
    pub top_k: u32,
    pub enable_enhanced_civic_answers: bool,
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_level: String,
    pub include_thoughts: bool,
}

/// Only `candidates` is read; each candidate is relayed untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Value>>,
}
