use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Where the instruction file lives and which model/API to use when the
/// caller's settings leave them open. Supplied with every relay request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MachineConfig {
    /// Base URL of the server hosting the instruction file
    pub server: String,
    /// Path of the instruction file, relative to `server`
    pub instructions_file: String,
    /// Model used when `settings.model` is absent or empty
    pub fallback_llm: String,
    /// Base URL the model name is appended to (e.g. `https://host/v1beta/models/`)
    #[serde(rename = "apiUrl")]
    pub api_url: String,
}

/// Per-request model settings. Optional knobs default only when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LlmSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_thoughts: Option<bool>,
}

/// A message part. Fields other than `text` (`thought`, `thoughtSignature`,
/// `inlineData`, ...) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One conversation turn, forwarded as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub parts: Vec<Part>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: Some(text.into()),
                extra: Map::new(),
            }],
            extra: Map::new(),
        }
    }
}

/// Inbound relay event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelayRequest {
    pub config: MachineConfig,
    pub settings: LlmSettings,
    /// Missing and `null` are both read as an empty conversation
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(value_type = Vec<Object>)]
    pub messages: Vec<Message>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Message>>::deserialize(deserializer)?.unwrap_or_default())
}
