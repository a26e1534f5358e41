use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// A single turn in a Gemini conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Author of the turn, if given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,
    /// Ordered parts of the turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Author of a content turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// The caller
    User,
    /// The model
    Model,
}

/// One piece of a content turn: text or inline binary data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text
    Text {
        /// Text content
        text: String,
    },
    /// Inline binary data such as an image or PDF
    InlineData {
        /// Encoded payload
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

/// Base64-encoded payload with its MIME type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type of the decoded bytes
    pub mime_type: String,
    /// Standard base64 encoding of the bytes
    pub data: String,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns
    pub contents: Vec<Content>,
    /// Sampling options; model defaults when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Sampling options
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Upper bound on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Response body from `generateContent`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated alternatives; empty when the prompt was blocked
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt safety feedback
    pub prompt_feedback: Option<PromptFeedback>,
    /// Token counts
    pub usage_metadata: Option<UsageMetadata>,
}

/// One generated alternative
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent for some finish reasons
    pub content: Option<Content>,
    /// Why generation stopped, e.g. `STOP` or `SAFETY`
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt, set when it was blocked
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked
    pub block_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    pub prompt_token_count: Option<u32>,
    /// Tokens across candidates
    pub candidates_token_count: Option<u32>,
    /// Prompt plus candidates
    pub total_token_count: Option<u32>,
}

/// Error envelope returned by the Google APIs on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    /// Error details
    pub error: ApiErrorDetail,
}

/// Error details inside [`ApiErrorEnvelope`]
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// HTTP status code
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Canonical status, e.g. `INVALID_ARGUMENT`
    pub status: Option<String>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create an inline data part, base64-encoding the raw bytes
    pub fn inline_data(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: STANDARD.encode(bytes),
            },
        }
    }

    /// Text of this part, if it is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        }
    }
}

impl Content {
    /// Create a user turn
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some(ContentRole::User),
            parts,
        }
    }
}

impl GenerateContentRequest {
    /// Create a single-turn request from user parts
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content::user(parts)],
            generation_config: None,
        }
    }

    /// Set sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
            .temperature = Some(temperature);
        self
    }

    /// Set max output tokens
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation_config
            .get_or_insert_with(GenerationConfig::default)
            .max_output_tokens = Some(max_output_tokens);
        self
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// Returns `None` when there is no candidate or it carries no text,
    /// which is how blocked or truncated generations show up.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(Part::as_text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Human-readable reason why [`text`](Self::text) came back empty
    pub fn empty_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked ({})", reason);
        }

        match self.candidates.first() {
            None => "no candidates returned".to_string(),
            Some(candidate) => match candidate.finish_reason.as_deref() {
                Some(reason) => format!("candidate had no text (finish reason: {})", reason),
                None => "candidate had no text".to_string(),
            },
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
