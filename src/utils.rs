use url::Url;

use crate::models::relay::{LlmSettings, MachineConfig};

pub fn instruction_url(machine: &MachineConfig) -> String {
    format!("{}/{}", machine.server, machine.instructions_file)
}

/// `settings.model` when it is a non-empty string, else the machine's fallback.
pub fn resolve_model<'a>(machine: &'a MachineConfig, settings: &'a LlmSettings) -> &'a str {
    match settings.model.as_deref() {
        Some(model) if !model.is_empty() => model,
        _ => &machine.fallback_llm,
    }
}

/// `<apiUrl><model>:generateContent?key=<token>`
pub fn generate_content_url(
    machine: &MachineConfig,
    model: &str,
    token: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}{}:generateContent", machine.api_url, model))?;
    url.query_pairs_mut().append_pair("key", token);
    Ok(url)
}

/// URL without its query, safe to log.
pub fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
