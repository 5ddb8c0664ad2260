use crate::error::RelayError;
use serde::Serialize;
use serde_json::Value;

pub const MAX_NEW_TOKENS: u32 = 512;
pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.9;

#[derive(Debug, Serialize)]
pub struct GenerationPayload<'a> {
    pub prompt: &'a str,
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub do_sample: bool,
}

impl<'a> GenerationPayload<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            max_new_tokens: MAX_NEW_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            do_sample: true,
        }
    }
}

/// Pulls `generated_text` out of a decoded endpoint response. Any other
/// fields the endpoint returns are ignored.
pub fn generated_text(response: &Value) -> Result<String, RelayError> {
    match response.get("generated_text") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(RelayError::ProtocolViolation(format!(
            "'generated_text' in the response from the local API is not a string: {}",
            other
        ))),
        None => Err(RelayError::missing_generated_text()),
    }
}
