// src/models/common.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// The single notification delivered for every relay request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayOutcome {
    /// First candidate returned by the model API
    Success { data: Value },
    Error { error: String },
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RelayOutcome::Success { .. })
    }
}
