use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    core::errors::{AppError, AppResult},
    storyboard::path::{get_at, FieldPath, PathSegment},
};

pub const PROMPT_OBJECT_KEY: &str = "prompt_object_v6";
pub const EDITABLE_PROVIDER: &str = "veo2";

/// Where an entry's PromptObjectV6 lives inside its `prompts` object.
/// Resolved once during normalization and carried with the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptSlot {
    /// `prompts.<provider>.prompt_object_v6`
    NestedUnderProvider { provider: String },
    /// `prompts.prompt_object_v6`
    Direct,
}

impl PromptSlot {
    pub fn locate(prompts: &Value) -> Option<Self> {
        let nested = Self::NestedUnderProvider {
            provider: EDITABLE_PROVIDER.to_string(),
        };
        if get_at(prompts, &nested.path()).is_some_and(Value::is_object) {
            return Some(nested);
        }
        if get_at(prompts, &Self::Direct.path()).is_some_and(Value::is_object) {
            return Some(Self::Direct);
        }
        None
    }

    /// Path of the slot relative to the entry's `prompts` object.
    pub fn path(&self) -> FieldPath {
        match self {
            Self::NestedUnderProvider { provider } => vec![
                PathSegment::Key(provider.clone()),
                PathSegment::Key(PROMPT_OBJECT_KEY.to_string()),
            ],
            Self::Direct => vec![PathSegment::Key(PROMPT_OBJECT_KEY.to_string())],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedSceneInfo {
    pub scene_id: String,
    pub scene_title: String,
    pub processed_shots: u64,
    pub processed_images: u64,
    pub selected_ai_tools: Vec<String>,
}

/// One leaf image or video item. `prompts` keeps its source shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPromptEntry {
    pub shot_id: String,
    pub image_id: String,
    pub prompts: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_data: Option<Map<String, Value>>,
    pub editable_slot: Option<PromptSlot>,
    /// Location of the source record in the raw document.
    #[serde(skip)]
    pub origin: FieldPath,
}

impl NormalizedPromptEntry {
    pub fn prompt_object(&self) -> Option<&Value> {
        let slot = self.editable_slot.as_ref()?;
        get_at(&self.prompts, &slot.path())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedModel {
    pub scene_info: UnifiedSceneInfo,
    pub version: Option<String>,
    pub timestamp: Option<String>,
    pub prompts: Vec<NormalizedPromptEntry>,
}

impl UnifiedModel {
    pub fn entry(&self, image_id: &str) -> Option<&NormalizedPromptEntry> {
        self.prompts.iter().find(|entry| entry.image_id == image_id)
    }

    /// Returns a copy with the entry sharing `updated.image_id` replaced.
    pub fn with_entry(&self, updated: NormalizedPromptEntry) -> AppResult<Self> {
        let mut next = self.clone();
        let slot = next
            .prompts
            .iter_mut()
            .find(|entry| entry.image_id == updated.image_id)
            .ok_or_else(|| AppError::NotFound(format!("entry {}", updated.image_id)))?;
        *slot = updated;
        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioView {
    pub description: Option<String>,
    pub lyrics: Option<String>,
    pub narration_script: String,
}

/// What a loaded document renders as.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentView {
    Storyboard(UnifiedModel),
    Audio(AudioView),
}

impl DocumentView {
    pub fn model(&self) -> Option<&UnifiedModel> {
        match self {
            Self::Storyboard(model) => Some(model),
            Self::Audio(_) => None,
        }
    }
}
