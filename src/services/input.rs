use std::fmt;
use std::path::Path;

use crate::error::{ApiError, ApiResult};

/// Topic used for uploads that arrive without a file name.
pub const UNNAMED_UPLOAD_TOPIC: &str = "Uploaded Content";

/// A file received from the client, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-supplied file name; may be empty.
    pub file_name: String,
    /// Declared MIME type; may be empty.
    pub content_type: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// How an upload is forwarded to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadKind {
    /// Sent as inline image data with this MIME type.
    Image(String),
    /// Sent as inline `application/pdf` data.
    Pdf,
    /// Decoded as UTF-8 and sent as prompt text.
    PlainText,
}

impl Upload {
    /// Create an upload
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// MIME type without parameters, lowercased. Falls back to a guess from
    /// the file extension when the declared type is missing or generic.
    pub fn mime_type(&self) -> String {
        let declared = self
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if declared.is_empty() || declared == "application/octet-stream" {
            if let Some(guessed) = mime_from_extension(&self.file_name) {
                return guessed.to_string();
            }
        }
        declared
    }

    /// Classify the upload, rejecting unsupported types
    pub fn kind(&self) -> ApiResult<UploadKind> {
        let mime = self.mime_type();
        if mime == "application/pdf" {
            Ok(UploadKind::Pdf)
        } else if mime == "text/plain" || mime == "text/markdown" {
            Ok(UploadKind::PlainText)
        } else if mime.starts_with("image/") {
            Ok(UploadKind::Image(mime))
        } else if mime.is_empty() {
            Err(ApiError::UnsupportedMediaType {
                content_type: "unknown".to_string(),
            })
        } else {
            Err(ApiError::UnsupportedMediaType { content_type: mime })
        }
    }

    /// File contents as UTF-8 text
    pub fn text(&self) -> ApiResult<&str> {
        std::str::from_utf8(&self.data).map_err(|_| ApiError::BadRequest {
            message: format!("File '{}' is not valid UTF-8 text", self.file_name),
        })
    }

    /// Name used as mind-map topic for this upload
    pub fn topic(&self) -> &str {
        let name = self.file_name.trim();
        if name.is_empty() {
            UNNAMED_UPLOAD_TOPIC
        } else {
            name
        }
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        _ => None,
    }
}

/// What the user asked about: typed text or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyInput {
    /// A typed question or concept.
    Text(String),
    /// An uploaded document or image.
    Document(Upload),
}

impl StudyInput {
    /// Build an input from optional text and an optional upload.
    ///
    /// The upload wins when both are present. Blank text without an upload
    /// is rejected with [`ApiError::MissingInput`].
    pub fn from_parts(text: Option<String>, upload: Option<Upload>) -> ApiResult<Self> {
        if let Some(upload) = upload {
            return Ok(StudyInput::Document(upload));
        }

        match text {
            Some(text) if !text.trim().is_empty() => Ok(StudyInput::Text(text.trim().to_string())),
            _ => Err(ApiError::MissingInput),
        }
    }

    /// Short label for logs
    pub fn describe(&self) -> &'static str {
        match self {
            StudyInput::Text(_) => "text",
            StudyInput::Document(_) => "document",
        }
    }
}
