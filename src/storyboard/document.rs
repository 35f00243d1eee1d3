use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Image,
    Video,
    Audio,
    Unknown,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Unknown => "unknown",
        }
    }
}

/// Classifies a parsed document by structural signature alone.
///
/// Checked in priority order: audio (`music_prompts` + `narration_script`),
/// video (`video_prompts` array), image (`shots` array). A document that
/// matches several signatures takes the first. `stage` and `version` are
/// never consulted.
pub fn detect(doc: &Value) -> DocumentKind {
    let Some(root) = doc.as_object() else {
        return DocumentKind::Unknown;
    };
    if root.contains_key("music_prompts") && root.contains_key("narration_script") {
        DocumentKind::Audio
    } else if root.get("video_prompts").is_some_and(Value::is_array) {
        DocumentKind::Video
    } else if root.get("shots").is_some_and(Value::is_array) {
        DocumentKind::Image
    } else {
        DocumentKind::Unknown
    }
}

/// A document as uploaded or generated, tagged by its detected shape. The
/// wrapped value is always a JSON object and is kept byte-for-byte in key
/// order so that export reproduces what came in plus the user's edits.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDocument {
    Image(Value),
    Video(Value),
    Audio(Value),
}

impl RawDocument {
    pub fn classify(doc: Value) -> AppResult<Self> {
        let kind = detect(&doc);
        debug!(kind = kind.as_str(), "classified document");
        match kind {
            DocumentKind::Image => Ok(Self::Image(doc)),
            DocumentKind::Video => Ok(Self::Video(doc)),
            DocumentKind::Audio => Ok(Self::Audio(doc)),
            DocumentKind::Unknown => Err(AppError::InvalidDocumentShape(
                "expected shots, video_prompts, or music_prompts with narration_script".to_string(),
            )),
        }
    }

    pub fn parse(text: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::classify(value)
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Image(_) => DocumentKind::Image,
            Self::Video(_) => DocumentKind::Video,
            Self::Audio(_) => DocumentKind::Audio,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Image(value) | Self::Video(value) | Self::Audio(value) => value,
        }
    }

    /// Rewraps an edited tree under the same variant.
    pub fn with_value(&self, value: Value) -> Self {
        match self {
            Self::Image(_) => Self::Image(value),
            Self::Video(_) => Self::Video(value),
            Self::Audio(_) => Self::Audio(value),
        }
    }

    pub fn to_pretty_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self.value())
            .map_err(|err| AppError::Internal(format!("failed to serialize document: {err}")))
    }
}
