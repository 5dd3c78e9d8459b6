//! Model wire types: content parts and the function-response envelope.
//!
//! A [`Part`] is the unit of model-visible content. Tool results are
//! fed back to the model as a list of parts beginning with a single
//! [`FunctionResponse`] envelope; binary parts the tool produced are
//! appended after the envelope.

use serde::Deserialize;
use serde::Serialize;

/// Inline binary content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// IANA media type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Binary content referenced by URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// IANA media type, e.g. `application/pdf`.
    pub mime_type: String,
    /// Location of the content.
    pub file_uri: String,
}

/// The payload inside a function-response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponseBody {
    /// Model-visible output text.
    pub output: String,
}

/// The structured payload returned to the model after a tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Tool name the response answers.
    pub name: String,
    /// Call identifier the response answers.
    pub id: String,
    /// Response body.
    pub response: FunctionResponseBody,
}

/// A unit of model-visible content.
///
/// Exactly one field is normally set; a part with no fields set is the
/// "empty-object part" some tools produce and is treated as generic
/// content by the response adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Plain text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    /// Binary content referenced by URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    /// A function-response envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Create an inline-data part.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
            ..Self::default()
        }
    }

    /// Create a file-data part.
    pub fn file_data(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self {
            file_data: Some(FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            }),
            ..Self::default()
        }
    }

    /// Create a function-response envelope part.
    pub fn function_response(
        name: impl Into<String>,
        id: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                name: name.into(),
                id: id.into(),
                response: FunctionResponseBody {
                    output: output.into(),
                },
            }),
            ..Self::default()
        }
    }

    /// The mime type of this part's binary payload, if it has one.
    pub fn binary_mime_type(&self) -> Option<&str> {
        if let Some(blob) = &self.inline_data {
            return Some(&blob.mime_type);
        }
        if let Some(file) = &self.file_data {
            return Some(&file.mime_type);
        }
        None
    }

    /// Check whether no field is set (the empty-object part).
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.inline_data.is_none()
            && self.file_data.is_none()
            && self.function_response.is_none()
    }
}

/// Content a tool hands back for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LlmContent {
    /// A bare string.
    Text(String),
    /// A single structured part.
    Part(Part),
    /// A list of parts.
    Parts(Vec<Part>),
}

impl Default for LlmContent {
    fn default() -> Self {
        LlmContent::Text(String::new())
    }
}

impl From<String> for LlmContent {
    fn from(text: String) -> Self {
        LlmContent::Text(text)
    }
}

impl From<&str> for LlmContent {
    fn from(text: &str) -> Self {
        LlmContent::Text(text.to_string())
    }
}

impl From<Part> for LlmContent {
    fn from(part: Part) -> Self {
        LlmContent::Part(part)
    }
}

impl From<Vec<Part>> for LlmContent {
    fn from(parts: Vec<Part>) -> Self {
        LlmContent::Parts(parts)
    }
}

#[cfg(test)]
#[path = "part.test.rs"]
mod tests;
