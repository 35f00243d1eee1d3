use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    core::errors::{AppError, AppResult},
    storyboard::path::{get_at, FieldPath, PathSegment},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptObjectV6 {
    pub core_module: CoreModule,
    pub video_module: VideoModule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreModule {
    pub character: BTreeMap<String, Character>,
    pub location_baseline: LocationBaseline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_consistency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationBaseline {
    pub setting: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoModule {
    pub metadata: VideoMetadata,
    pub global: GlobalDirection,
    pub sequence: Vec<SequenceStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue_block: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalDirection {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    pub motion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<SequenceEffect>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceEffect {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl Default for PromptObjectV6 {
    /// The blank object the editor opens on when an entry carries none.
    fn default() -> Self {
        Self {
            core_module: CoreModule {
                character: BTreeMap::new(),
                location_baseline: LocationBaseline {
                    setting: String::new(),
                    details: Some(String::new()),
                },
                project_style: Some(String::new()),
            },
            video_module: VideoModule {
                metadata: VideoMetadata {
                    duration_seconds: 0.0,
                },
                global: GlobalDirection {
                    description: String::new(),
                    style: None,
                },
                sequence: Vec::new(),
                negative_prompts: None,
                dialogue_block: None,
            },
        }
    }
}

impl PromptObjectV6 {
    pub fn to_value(&self) -> AppResult<Value> {
        serde_json::to_value(self).map_err(|err| AppError::Internal(err.to_string()))
    }
}

/// A form field the editor renders for a draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableField {
    pub label: String,
    pub path: FieldPath,
    pub value: Value,
    pub numeric: bool,
}

fn key_path(keys: &[&str]) -> FieldPath {
    keys.iter().map(|key| PathSegment::from(*key)).collect()
}

fn text_field(draft: &Value, label: &str, path: FieldPath) -> EditableField {
    let value = get_at(draft, &path)
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));
    EditableField {
        label: label.to_string(),
        path,
        value,
        numeric: false,
    }
}

/// Lists the fields offered for structured editing, in form order. Sections
/// absent from the draft are left out, except `project_style`, which is
/// always offered once a `core_module` exists.
pub fn editable_fields(draft: &Value) -> Vec<EditableField> {
    let Some(core) = draft.get("core_module").and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut fields = Vec::new();

    if let Some(characters) = core.get("character").and_then(Value::as_object) {
        for name in characters.keys() {
            fields.push(text_field(
                draft,
                name,
                key_path(&["core_module", "character", name.as_str(), "id"]),
            ));
        }
    }
    if core.get("location_baseline").is_some_and(Value::is_object) {
        fields.push(text_field(
            draft,
            "setting",
            key_path(&["core_module", "location_baseline", "setting"]),
        ));
        fields.push(text_field(
            draft,
            "details",
            key_path(&["core_module", "location_baseline", "details"]),
        ));
    }
    fields.push(text_field(
        draft,
        "project style",
        key_path(&["core_module", "project_style"]),
    ));

    let Some(video) = draft.get("video_module").and_then(Value::as_object) else {
        return fields;
    };
    if video.get("metadata").is_some_and(Value::is_object) {
        let path = key_path(&["video_module", "metadata", "duration_seconds"]);
        let value = get_at(draft, &path).cloned().unwrap_or_else(|| Value::from(0));
        fields.push(EditableField {
            label: "duration (seconds)".to_string(),
            path,
            value,
            numeric: true,
        });
    }
    if video.get("global").is_some_and(Value::is_object) {
        fields.push(text_field(
            draft,
            "global description",
            key_path(&["video_module", "global", "description"]),
        ));
    }
    if let Some(sequence) = video.get("sequence").and_then(Value::as_array) {
        for idx in 0..sequence.len() {
            for key in ["timestamp", "camera", "motion"] {
                let path = vec![
                    PathSegment::from("video_module"),
                    PathSegment::from("sequence"),
                    PathSegment::from(idx),
                    PathSegment::from(key),
                ];
                fields.push(text_field(draft, &format!("sequence {} {key}", idx + 1), path));
            }
        }
    }
    fields
}

/// A draft must still look like a PromptObjectV6 before it is written back.
pub fn validate_draft(draft: &Value) -> AppResult<()> {
    for module in ["core_module", "video_module"] {
        if !draft.get(module).is_some_and(Value::is_object) {
            return Err(AppError::InvalidInput(format!(
                "edited prompt object must keep an object-valued {module}"
            )));
        }
    }
    Ok(())
}
