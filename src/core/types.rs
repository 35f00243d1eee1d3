use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    core::errors::AppError,
    storyboard::{
        document::DocumentKind,
        model::{AudioView, PromptSlot, UnifiedModel},
        prompt_object::EditableField,
    },
    studio::session::StudioMode,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProviderKeyResponse {
    pub stored: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearProviderKeyResponse {
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigResponse {
    pub provider: Provider,
    pub has_api_key: bool,
    pub model: String,
    pub default_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    pub models: Vec<String>,
    pub selected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionResponse {
    pub model: String,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub plan: String,
    pub image_ids: Vec<String>,
}

/// One shot as the studio list renders it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShotGroupView {
    pub shot_id: String,
    pub shot_description: Option<String>,
    pub plans: Vec<PlanView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub image_id: String,
    pub value: Value,
    pub fields: Vec<EditableField>,
    pub slot: Option<PromptSlot>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingGeneration {
    pub request_id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: StudioMode,
    pub loaded: bool,
    pub source_name: Option<String>,
    pub document_kind: Option<DocumentKind>,
    pub model: Option<UnifiedModel>,
    pub shots: Vec<ShotGroupView>,
    pub audio: Option<AudioView>,
    pub total_duration_seconds: Option<f64>,
    pub draft: Option<DraftView>,
    pub pending_generation: Option<PendingGeneration>,
    pub last_error: Option<AppError>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub status: GenerationStatus,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocumentResponse {
    pub file_name: String,
    pub path: String,
    pub bytes: usize,
}
