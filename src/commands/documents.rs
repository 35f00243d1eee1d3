use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{ExportDocumentResponse, SessionSnapshot},
    },
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentArgs {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDocumentTextArgs {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocumentArgs {
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveShotArgs {
    pub shot_id: String,
}

pub async fn upload_document(state: &AppState, args: UploadDocumentArgs) -> AppResult<SessionSnapshot> {
    let path = PathBuf::from(args.file_path.trim());
    if path.as_os_str().is_empty() {
        return Err(AppError::InvalidInput("file path cannot be empty".to_string()));
    }
    state.studio.upload_file(&path).await
}

pub async fn load_document_text(
    state: &AppState,
    args: LoadDocumentTextArgs,
) -> AppResult<SessionSnapshot> {
    state
        .studio
        .load_text(&args.file_name, &args.contents)
        .await
}

/// Writes into `directory`, or `<data dir>/exports` when none is given.
pub async fn export_document(
    state: &AppState,
    args: ExportDocumentArgs,
) -> AppResult<ExportDocumentResponse> {
    let directory = match args.directory.as_deref().map(str::trim) {
        Some(directory) if !directory.is_empty() => PathBuf::from(directory),
        _ => state.data_dir.join("exports"),
    };
    state.studio.export_to(&directory).await
}

pub async fn remove_shot(state: &AppState, args: RemoveShotArgs) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| session.remove_shot(&args.shot_id))
        .await
}
