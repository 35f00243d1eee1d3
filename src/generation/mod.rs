pub mod prompts;
pub mod schema;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    core::errors::{AppError, AppResult},
    storyboard::{
        document::{DocumentKind, RawDocument},
        shots::validate_shot,
    },
};

use schema::{response_schema, AudioDocumentSpec, ShotSpec, StoryboardSpec, VideoDocumentSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationLanguage {
    Ko,
    En,
}

impl NarrationLanguage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ko => "Korean",
            Self::En => "English",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    Storyboard { idea: String },
    VideoPrompts,
    AudioPrompts { language: NarrationLanguage },
    AdditionalShot { idea: Option<String> },
}

impl GenerationRequest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Storyboard { .. } => "storyboard",
            Self::VideoPrompts => "video_prompts",
            Self::AudioPrompts { .. } => "audio_prompts",
            Self::AdditionalShot { .. } => "additional_shot",
        }
    }

    /// Document kind a successful response must classify as. An additional
    /// shot is a fragment, not a document.
    pub fn expected_kind(&self) -> Option<DocumentKind> {
        match self {
            Self::Storyboard { .. } => Some(DocumentKind::Image),
            Self::VideoPrompts => Some(DocumentKind::Video),
            Self::AudioPrompts { .. } => Some(DocumentKind::Audio),
            Self::AdditionalShot { .. } => None,
        }
    }

    pub fn response_schema(&self) -> Value {
        match self {
            Self::Storyboard { .. } => response_schema::<StoryboardSpec>(),
            Self::VideoPrompts => response_schema::<VideoDocumentSpec>(),
            Self::AudioPrompts { .. } => response_schema::<AudioDocumentSpec>(),
            Self::AdditionalShot { .. } => response_schema::<ShotSpec>(),
        }
    }
}

#[derive(Clone)]
pub struct GenerationCredentials {
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for GenerationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationCredentials")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// The AI collaborator: instruction text plus a response schema in, JSON
/// text out.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        credentials: &GenerationCredentials,
        instruction: &str,
        response_schema: &Value,
    ) -> AppResult<String>;
}

/// Issued when a generation starts. Completion is only accepted while the
/// session epoch still equals `epoch`.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub request_id: Uuid,
    pub epoch: u64,
    pub request: GenerationRequest,
    pub instruction: String,
    pub response_schema: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedContent {
    Document(RawDocument),
    Shot(Value),
}

/// Parses and shape-checks a collaborator response for `request`.
pub fn parse_generated(request: &GenerationRequest, text: &str) -> AppResult<GeneratedContent> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|err| AppError::ProviderInvalidResponse(format!("model output not JSON: {err}")))?;
    let Some(expected) = request.expected_kind() else {
        validate_shot(&value)?;
        return Ok(GeneratedContent::Shot(value));
    };
    let document = RawDocument::classify(value)?;
    if document.kind() != expected {
        return Err(AppError::InvalidDocumentShape(format!(
            "expected a generated {} document, got {}",
            expected.as_str(),
            document.kind().as_str()
        )));
    }
    Ok(GeneratedContent::Document(document))
}
