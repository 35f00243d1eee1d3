use serde::Serialize;

use crate::{
    core::errors::AppResult,
    storyboard::document::{DocumentKind, RawDocument},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

fn kind_suffix(kind: DocumentKind) -> Option<&'static str> {
    match kind {
        DocumentKind::Video => Some("_video"),
        DocumentKind::Audio => Some("_audio"),
        DocumentKind::Image | DocumentKind::Unknown => None,
    }
}

/// `scene.json` becomes `scene_video.json` / `scene_audio.json`; image
/// documents keep their name.
pub fn export_file_name(source_name: &str, kind: DocumentKind) -> String {
    let stem = source_name
        .strip_suffix(".json")
        .or_else(|| source_name.strip_suffix(".JSON"))
        .unwrap_or(source_name);
    let stem = if stem.trim().is_empty() { "storyboard" } else { stem };
    match kind_suffix(kind) {
        Some(suffix) if !stem.ends_with(suffix) => format!("{stem}{suffix}.json"),
        _ => format!("{stem}.json"),
    }
}

/// Serializes the raw document (never the unified model), two-space
/// indented.
pub fn export_document(source_name: &str, doc: &RawDocument) -> AppResult<ExportedFile> {
    Ok(ExportedFile {
        file_name: export_file_name(source_name, doc.kind()),
        contents: doc.to_pretty_json()?,
    })
}
