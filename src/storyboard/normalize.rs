//! Projection of each raw document shape into the one model every view reads.
//!
//! All functions here are pure. A document that matched a signature but
//! lacks a field the projection needs fails as a whole with
//! `AppError::Normalization` naming the item; nothing is skipped.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    core::errors::{AppError, AppResult},
    storyboard::{
        document::RawDocument,
        model::{
            AudioView, DocumentView, NormalizedPromptEntry, PromptSlot, UnifiedModel,
            UnifiedSceneInfo,
        },
        path::PathSegment,
    },
};

pub fn normalize(doc: &RawDocument) -> AppResult<DocumentView> {
    match doc {
        RawDocument::Image(value) => normalize_image(value).map(DocumentView::Storyboard),
        RawDocument::Video(value) => normalize_video(value).map(DocumentView::Storyboard),
        RawDocument::Audio(value) => audio_view(value).map(DocumentView::Audio),
    }
}

pub fn normalize_image(doc: &Value) -> AppResult<UnifiedModel> {
    let root = as_object(doc, "document")?;
    let scene = required_object(root, "scene_info", "document")?;
    let scene_id = required_string(scene, "scene_id", "scene_info")?;
    let shots = required_array(root, "shots", "document")?;

    let mut entries = Vec::new();
    for (shot_idx, shot_value) in shots.iter().enumerate() {
        let label = format!("shots[{shot_idx}]");
        let shot = as_object(shot_value, &label)?;
        let shot_id = required_string(shot, "shot_id", &label)?;
        let label = format!("{label} ({shot_id})");
        let shot_description = optional_string(shot, "shot_description", &label)?;
        let images = required_array(shot, "images", &label)?;

        for (image_idx, image_value) in images.iter().enumerate() {
            let label = format!("shots[{shot_idx}].images[{image_idx}]");
            let image = as_object(image_value, &label)?;
            let image_id = required_string(image, "image_id", &label)?;
            let label = format!("{label} ({image_id})");
            let prompts = Value::Object(required_object(image, "prompts", &label)?.clone());
            let csv_data = match image.get("csv_data") {
                None | Some(Value::Null) => None,
                Some(Value::Object(map)) => Some(map.clone()),
                Some(_) => return Err(wrong_type(&label, "csv_data", "an object")),
            };

            entries.push(NormalizedPromptEntry {
                shot_id: shot_id.clone(),
                editable_slot: PromptSlot::locate(&prompts),
                image_id,
                prompts,
                shot_description: shot_description.clone(),
                image_title: optional_string(image, "image_title", &label)?,
                image_description: optional_string(image, "image_description", &label)?,
                csv_data,
                origin: vec![
                    PathSegment::from("shots"),
                    PathSegment::from(shot_idx),
                    PathSegment::from("images"),
                    PathSegment::from(image_idx),
                ],
            });
        }
    }
    ensure_unique_image_ids(&entries)?;

    let scene_title = match optional_string(scene, "scene_title", "scene_info")? {
        Some(title) => title,
        None => shots
            .first()
            .and_then(|shot| shot.get("shot_description"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| scene_id.clone()),
    };
    let selected_ai_tools = match root.get("generation_settings") {
        Some(Value::Object(settings)) => string_list(settings, "selected_ai_tools", "generation_settings")?,
        _ => Vec::new(),
    };
    let scene_info = UnifiedSceneInfo {
        processed_shots: optional_count(scene, "shot_count", "scene_info")?
            .unwrap_or(shots.len() as u64),
        processed_images: optional_count(scene, "total_images", "scene_info")?
            .unwrap_or(entries.len() as u64),
        scene_id,
        scene_title,
        selected_ai_tools,
    };

    debug!(entries = entries.len(), "normalized image document");
    Ok(UnifiedModel {
        scene_info,
        version: optional_text(root, "version"),
        timestamp: optional_text(root, "timestamp"),
        prompts: entries,
    })
}

pub fn normalize_video(doc: &Value) -> AppResult<UnifiedModel> {
    let root = as_object(doc, "document")?;
    let scene = required_object(root, "scene_info", "document")?;
    let scene_id = required_string(scene, "scene_id", "scene_info")?;
    let items = required_array(root, "video_prompts", "document")?;

    let mut entries = Vec::with_capacity(items.len());
    for (idx, item_value) in items.iter().enumerate() {
        let label = format!("video_prompts[{idx}]");
        let item = as_object(item_value, &label)?;
        let image_id = required_string(item, "image_id", &label)?;
        let label = format!("{label} ({image_id})");
        let shot_id = required_string(item, "shot_id", &label)?;
        let prompts = Value::Object(required_object(item, "prompts", &label)?.clone());
        let (image_title, image_description) = match item.get("image_reference") {
            None | Some(Value::Null) => (None, None),
            Some(Value::Object(reference)) => {
                let reference_label = format!("{label}.image_reference");
                (
                    optional_string(reference, "title", &reference_label)?,
                    optional_string(reference, "description", &reference_label)?,
                )
            }
            Some(_) => return Err(wrong_type(&label, "image_reference", "an object")),
        };

        entries.push(NormalizedPromptEntry {
            shot_id,
            editable_slot: PromptSlot::locate(&prompts),
            image_id,
            prompts,
            shot_description: None,
            image_title,
            image_description,
            csv_data: None,
            origin: vec![PathSegment::from("video_prompts"), PathSegment::from(idx)],
        });
    }
    ensure_unique_image_ids(&entries)?;

    let distinct_shots = entries
        .iter()
        .map(|entry| entry.shot_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;
    let selected_ai_tools = if scene.contains_key("selected_ai_tools") {
        string_list(scene, "selected_ai_tools", "scene_info")?
    } else {
        match root.get("generation_settings") {
            Some(Value::Object(settings)) => {
                string_list(settings, "selected_ai_tools", "generation_settings")?
            }
            _ => Vec::new(),
        }
    };
    let scene_info = UnifiedSceneInfo {
        scene_title: optional_string(scene, "scene_title", "scene_info")?
            .unwrap_or_else(|| scene_id.clone()),
        processed_shots: optional_count(scene, "processed_shots", "scene_info")?
            .unwrap_or(distinct_shots),
        processed_images: optional_count(scene, "processed_images", "scene_info")?
            .unwrap_or(entries.len() as u64),
        scene_id,
        selected_ai_tools,
    };

    debug!(entries = entries.len(), "normalized video document");
    Ok(UnifiedModel {
        scene_info,
        version: optional_text(root, "version"),
        timestamp: optional_text(root, "timestamp"),
        prompts: entries,
    })
}

pub fn audio_view(doc: &Value) -> AppResult<AudioView> {
    let root = as_object(doc, "document")?;
    let (description, lyrics) = match root.get("music_prompts") {
        Some(Value::Object(music)) => (
            optional_string(music, "description", "music_prompts")?,
            optional_string(music, "lyrics", "music_prompts")?,
        ),
        Some(Value::Null) | None => (None, None),
        Some(_) => return Err(wrong_type("document", "music_prompts", "an object")),
    };
    let narration_script = required_string(root, "narration_script", "document")?;
    Ok(AudioView {
        description,
        lyrics,
        narration_script,
    })
}

fn ensure_unique_image_ids(entries: &[NormalizedPromptEntry]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.image_id.as_str()) {
            return Err(AppError::Normalization(format!(
                "duplicate image_id {} (shot {})",
                entry.image_id, entry.shot_id
            )));
        }
    }
    Ok(())
}

fn as_object<'a>(value: &'a Value, label: &str) -> AppResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| AppError::Normalization(format!("{label}: expected an object")))
}

fn missing(label: &str, key: &str) -> AppError {
    AppError::Normalization(format!("{label}: missing field \"{key}\""))
}

fn wrong_type(label: &str, key: &str, expected: &str) -> AppError {
    AppError::Normalization(format!("{label}: field \"{key}\" must be {expected}"))
}

fn required_object<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    label: &str,
) -> AppResult<&'a Map<String, Value>> {
    match map.get(key) {
        Some(Value::Object(inner)) => Ok(inner),
        None | Some(Value::Null) => Err(missing(label, key)),
        Some(_) => Err(wrong_type(label, key, "an object")),
    }
}

fn required_array<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    label: &str,
) -> AppResult<&'a Vec<Value>> {
    match map.get(key) {
        Some(Value::Array(items)) => Ok(items),
        None | Some(Value::Null) => Err(missing(label, key)),
        Some(_) => Err(wrong_type(label, key, "an array")),
    }
}

fn required_string(map: &Map<String, Value>, key: &str, label: &str) -> AppResult<String> {
    optional_string(map, key, label)?.ok_or_else(|| missing(label, key))
}

fn optional_string(map: &Map<String, Value>, key: &str, label: &str) -> AppResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(wrong_type(label, key, "a string")),
    }
}

fn optional_count(map: &Map<String, Value>, key: &str, label: &str) -> AppResult<Option<u64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| wrong_type(label, key, "a non-negative integer")),
    }
}

fn string_list(map: &Map<String, Value>, key: &str, label: &str) -> AppResult<Vec<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(label, key, "a list of strings"))
            })
            .collect(),
        Some(_) => Err(wrong_type(label, key, "a list of strings")),
    }
}

/// `version` and `timestamp` are informational; numbers are accepted too.
fn optional_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
