use serde::Deserialize;

use crate::{
    core::{errors::AppResult, types::SessionSnapshot},
    studio::StudioMode,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStudioArgs {
    pub mode: StudioMode,
}

pub async fn get_session(state: &AppState) -> SessionSnapshot {
    state.studio.snapshot().await
}

pub async fn select_studio(state: &AppState, args: SelectStudioArgs) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| session.select_mode(args.mode))
        .await
}

pub async fn go_home(state: &AppState) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| {
            session.go_home();
            Ok(())
        })
        .await
}

pub async fn clear_project(state: &AppState) -> AppResult<SessionSnapshot> {
    state
        .studio
        .update(|session| {
            session.clear();
            Ok(())
        })
        .await
}
