//! Conversion of tool return payloads into function responses.
//!
//! Whatever shape a tool hands back (a bare string, a single part, or
//! a part list), the model always receives a list that begins with one
//! function-response envelope. Binary parts are summarized in the
//! envelope and re-appended after it so the model still sees them.

use relay_protocol::LlmContent;
use relay_protocol::Part;

/// Envelope output used when the payload carries no usable text.
const DEFAULT_SUCCESS_OUTPUT: &str = "Tool execution succeeded.";

fn binary_processed_output(mime_type: &str) -> String {
    format!("Binary content of type {mime_type} was processed.")
}

fn envelope(name: &str, call_id: &str, output: impl Into<String>) -> Part {
    Part::function_response(name, call_id, output)
}

/// Convert a tool's return payload into the part list fed back to the
/// model.
///
/// The first element is always a function-response envelope carrying
/// `name` and `call_id`; any binary parts from the payload follow it.
pub fn convert_to_function_response(
    name: &str,
    call_id: &str,
    llm_content: &LlmContent,
) -> Vec<Part> {
    match llm_content {
        // A bare string is the output, the empty string included.
        LlmContent::Text(text) => vec![envelope(name, call_id, text.clone())],

        LlmContent::Part(part) => {
            if let Some(text) = &part.text {
                return vec![envelope(name, call_id, text.clone())];
            }
            if let Some(mime_type) = part.binary_mime_type() {
                return vec![
                    envelope(name, call_id, binary_processed_output(mime_type)),
                    part.clone(),
                ];
            }
            vec![envelope(name, call_id, DEFAULT_SUCCESS_OUTPUT)]
        }

        LlmContent::Parts(parts) => match parts.as_slice() {
            [only] if only.text.is_some() => {
                vec![envelope(name, call_id, only.text.clone().unwrap_or_default())]
            }
            [only] if only.binary_mime_type().is_some() => {
                let mime_type = only.binary_mime_type().unwrap_or_default().to_string();
                vec![
                    envelope(name, call_id, binary_processed_output(&mime_type)),
                    only.clone(),
                ]
            }
            _ => {
                let mut result = vec![envelope(name, call_id, DEFAULT_SUCCESS_OUTPUT)];
                result.extend(parts.iter().cloned());
                result
            }
        },
    }
}

#[cfg(test)]
#[path = "response.test.rs"]
mod tests;
