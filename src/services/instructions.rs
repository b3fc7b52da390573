use tracing::info;

use crate::{models::relay::MachineConfig, utils::instruction_url};

/// Result of the best-effort instruction fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Fetched(String),
    Defaulted { text: String, reason: String },
}

impl Instruction {
    pub fn text(&self) -> &str {
        match self {
            Instruction::Fetched(text) => text,
            Instruction::Defaulted { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Instruction::Fetched(text) => text,
            Instruction::Defaulted { text, .. } => text,
        }
    }
}

/// GET `<server>/<instructions_file>`. Never fails: any problem yields
/// `Instruction::Defaulted` carrying `fallback`.
pub async fn fetch_instruction(
    http: &reqwest::Client,
    machine: &MachineConfig,
    fallback: &str,
) -> Instruction {
    let url = instruction_url(machine);
    info!("Fetching machine instruction from {}", machine.server);

    let defaulted = |reason: String| Instruction::Defaulted {
        text: fallback.to_string(),
        reason,
    };

    let res = match http.get(&url).send().await {
        Ok(res) => res,
        Err(e) => return defaulted(format!("request error: {e}")),
    };
    if !res.status().is_success() {
        return defaulted(format!("instruction status {}", res.status().as_u16()));
    }
    match res.text().await {
        Ok(body) => Instruction::Fetched(body.trim().to_string()),
        Err(e) => defaulted(format!("body error: {e}")),
    }
}
