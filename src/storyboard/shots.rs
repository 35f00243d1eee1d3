use serde_json::Value;

use crate::{
    core::errors::{AppError, AppResult},
    storyboard::document::{detect, DocumentKind, RawDocument},
};

/// Id for the shot after `last`, e.g. `S01.03` -> `S01.04`. With no
/// previous shot the sequence starts at `S01.01`.
pub fn next_shot_id(last: Option<&str>) -> AppResult<String> {
    let last = last.unwrap_or("S01.00");
    let (prefix, number) = match last.rsplit_once('.') {
        Some((prefix, number)) => (prefix, number.parse::<u32>().unwrap_or(0)),
        None => (last, 0),
    };
    let next = number
        .checked_add(1)
        .ok_or_else(|| AppError::InvalidInput(format!("no shot number follows {last}")))?;
    Ok(format!("{prefix}.{next:02}"))
}

pub fn last_shot_id(doc: &Value) -> Option<&str> {
    doc.get("shots")?
        .as_array()?
        .last()?
        .get("shot_id")?
        .as_str()
}

/// A generated single shot must carry an id and an image list.
pub fn validate_shot(shot: &Value) -> AppResult<()> {
    let valid = shot.get("shot_id").is_some_and(Value::is_string)
        && shot.get("images").is_some_and(Value::is_array);
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidDocumentShape(
            "expected a shot object with shot_id and images".to_string(),
        ))
    }
}

fn image_document(doc: &RawDocument) -> AppResult<&Value> {
    match doc {
        RawDocument::Image(value) => Ok(value),
        other => Err(AppError::InvalidState(format!(
            "shots can only be changed in an image document, not {}",
            other.kind().as_str()
        ))),
    }
}

fn shots_mut(root: &mut Value) -> AppResult<&mut Vec<Value>> {
    root.get_mut("shots")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| AppError::Internal("image document lost its shots array".to_string()))
}

/// Recounts `scene_info.shot_count` and `total_images`. A shot without a
/// whole-number `image_count` contributes the length of its `images` list.
pub fn recalculate_totals(doc: &mut Value) {
    let Some(shots) = doc.get("shots").and_then(Value::as_array) else {
        return;
    };
    let shot_count = shots.len() as u64;
    let total_images: u64 = shots
        .iter()
        .map(|shot| {
            shot.get("image_count").and_then(Value::as_u64).unwrap_or_else(|| {
                shot.get("images")
                    .and_then(Value::as_array)
                    .map_or(0, |images| images.len() as u64)
            })
        })
        .sum();
    if let Some(scene) = doc.get_mut("scene_info").and_then(Value::as_object_mut) {
        scene.insert("shot_count".to_string(), Value::from(shot_count));
        scene.insert("total_images".to_string(), Value::from(total_images));
    }
}

/// Sum of `estimated_duration_seconds` over all shots. Fractional seconds
/// count as written.
pub fn total_duration_seconds(doc: &Value) -> f64 {
    doc.get("shots")
        .and_then(Value::as_array)
        .map_or(0.0, |shots| {
            shots
                .iter()
                .filter_map(|shot| shot.get("estimated_duration_seconds").and_then(Value::as_f64))
                .sum()
        })
}

/// Appends `shot` to an image document and recounts the totals.
pub fn append_shot(doc: &RawDocument, shot: Value) -> AppResult<RawDocument> {
    let mut next = image_document(doc)?.clone();
    validate_shot(&shot)?;
    shots_mut(&mut next)?.push(shot);
    recalculate_totals(&mut next);
    debug_assert_eq!(detect(&next), DocumentKind::Image);
    Ok(RawDocument::Image(next))
}

/// Drops every shot with `shot_id` and recounts the totals.
pub fn remove_shot(doc: &RawDocument, shot_id: &str) -> AppResult<RawDocument> {
    let mut next = image_document(doc)?.clone();
    let shots = shots_mut(&mut next)?;
    let before = shots.len();
    shots.retain(|shot| shot.get("shot_id").and_then(Value::as_str) != Some(shot_id));
    if shots.len() == before {
        return Err(AppError::NotFound(format!("shot {shot_id}")));
    }
    recalculate_totals(&mut next);
    Ok(RawDocument::Image(next))
}
