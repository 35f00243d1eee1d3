use serde::Deserialize;
use serde_json::Value;

use crate::{
    core::{errors::AppResult, types::SessionSnapshot},
    storyboard::path::FieldPath,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPromptEditorArgs {
    pub image_id: String,
}

/// `path` is relative to the draft PromptObjectV6, e.g.
/// `["video_module", "sequence", 0, "motion"]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptFieldArgs {
    pub path: FieldPath,
    pub value: Value,
}

pub async fn open_prompt_editor(
    state: &AppState,
    args: OpenPromptEditorArgs,
) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| session.open_editor(&args.image_id).map(|_| ()))
        .await
}

pub async fn update_prompt_field(
    state: &AppState,
    args: UpdatePromptFieldArgs,
) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| session.edit_field(&args.path, args.value))
        .await
}

pub async fn save_prompt_edit(state: &AppState) -> AppResult<SessionSnapshot> {
    state.studio.update(|session| session.save_draft()).await
}

pub async fn discard_prompt_edit(state: &AppState) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| {
            session.discard_draft();
            Ok(())
        })
        .await
}
