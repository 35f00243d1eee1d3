use serde_json::Value;
use tracing::debug;

use crate::{
    core::errors::{AppError, AppResult},
    storyboard::{
        document::RawDocument,
        model::NormalizedPromptEntry,
        path::{describe_path, set_at, PathSegment},
    },
};

/// Writes an edited PromptObjectV6 into the entry's resolved slot and
/// returns the new entry. Sibling providers and the slot's own siblings
/// (`prompt_en`, `settings`, ...) are carried over untouched.
pub fn reintegrate(entry: &NormalizedPromptEntry, edited: &Value) -> AppResult<NormalizedPromptEntry> {
    let slot = entry
        .editable_slot
        .as_ref()
        .ok_or_else(|| AppError::NoEditableTarget(entry.image_id.clone()))?;
    let prompts = set_at(&entry.prompts, &slot.path(), edited.clone())?;
    debug!(image_id = %entry.image_id, slot = %describe_path(&slot.path()), "reintegrated prompt object");
    Ok(NormalizedPromptEntry {
        prompts,
        ..entry.clone()
    })
}

/// Copies the entry's `prompts` back onto its source record in the raw
/// document.
pub fn write_back(raw: &RawDocument, entry: &NormalizedPromptEntry) -> AppResult<RawDocument> {
    if entry.origin.is_empty() {
        return Err(AppError::Internal(format!(
            "entry {} has no recorded origin",
            entry.image_id
        )));
    }
    let mut path = entry.origin.clone();
    path.push(PathSegment::from("prompts"));
    let value = set_at(raw.value(), &path, entry.prompts.clone())?;
    Ok(raw.with_value(value))
}
