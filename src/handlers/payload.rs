use crate::models::{
    gemini::{ContentEntry, GenerateContentRequest, GenerationConfig, SafetySetting, ThinkingConfig},
    relay::{LlmSettings, Message},
};

pub const DEFAULT_PROMPT: &str = "What model are you?";

const DEFAULT_TEMPERATURE: f64 = 0.5;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 10_000;
const DEFAULT_TOP_P: f64 = 0.9;
const DEFAULT_TOP_K: u32 = 50;
const DEFAULT_THINKING_LEVEL: &str = "low";
const DEFAULT_INCLUDE_THOUGHTS: bool = true;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_HARASSMENT",
];

/// A non-empty conversation goes out as a single nested entry; an empty one
/// is replaced by the default user prompt.
pub fn assemble_contents(messages: Vec<Message>) -> Vec<ContentEntry> {
    if messages.is_empty() {
        vec![ContentEntry::Message(Message::text("user", DEFAULT_PROMPT))]
    } else {
        vec![ContentEntry::Conversation(messages)]
    }
}

pub fn system_instruction(text: impl Into<String>) -> Message {
    Message::text("developer", text)
}

pub fn safety_settings() -> Vec<SafetySetting> {
    SAFETY_CATEGORIES
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
}

/// Only absent settings take defaults; explicit zeros and `false` are kept.
/// An empty `thinkingLevel` counts as absent.
pub fn generation_config(settings: &LlmSettings) -> GenerationConfig {
    GenerationConfig {
        stop_sequences: vec!["STOP", "Title"],
        response_mime_type: "text/plain",
        response_modalities: vec!["TEXT"],
        temperature: settings.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_output_tokens: settings
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        candidate_count: 1,
        top_p: settings.top_p.unwrap_or(DEFAULT_TOP_P),
        top_k: settings.top_k.unwrap_or(DEFAULT_TOP_K),
        enable_enhanced_civic_answers: false,
        thinking_config: ThinkingConfig {
            thinking_level: settings
                .thinking_level
                .clone()
                .filter(|level| !level.is_empty())
                .unwrap_or_else(|| DEFAULT_THINKING_LEVEL.to_string()),
            include_thoughts: settings.include_thoughts.unwrap_or(DEFAULT_INCLUDE_THOUGHTS),
        },
    }
}

pub fn build_payload(
    instruction: String,
    settings: &LlmSettings,
    messages: Vec<Message>,
) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: system_instruction(instruction),
        safety_settings: safety_settings(),
        generation_config: generation_config(settings),
        contents: assemble_contents(messages),
    }
}
