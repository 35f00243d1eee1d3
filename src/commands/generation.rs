use serde::Deserialize;

use crate::{
    commands::settings::resolve_credentials,
    core::{errors::AppResult, types::GenerateResponse},
    generation::{GenerationRequest, NarrationLanguage},
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryboardArgs {
    pub idea: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioPromptsArgs {
    pub language: NarrationLanguage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAdditionalShotArgs {
    #[serde(default)]
    pub idea: Option<String>,
}

async fn run(state: &AppState, request: GenerationRequest) -> AppResult<GenerateResponse> {
    let credentials = resolve_credentials(state).await?;
    state.studio.generate(request, credentials).await
}

pub async fn generate_storyboard(
    state: &AppState,
    args: GenerateStoryboardArgs,
) -> AppResult<GenerateResponse> {
    run(state, GenerationRequest::Storyboard { idea: args.idea }).await
}

pub async fn generate_video_prompts(state: &AppState) -> AppResult<GenerateResponse> {
    run(state, GenerationRequest::VideoPrompts).await
}

pub async fn generate_audio_prompts(
    state: &AppState,
    args: GenerateAudioPromptsArgs,
) -> AppResult<GenerateResponse> {
    run(
        state,
        GenerationRequest::AudioPrompts {
            language: args.language,
        },
    )
    .await
}

pub async fn generate_additional_shot(
    state: &AppState,
    args: GenerateAdditionalShotArgs,
) -> AppResult<GenerateResponse> {
    run(state, GenerationRequest::AdditionalShot { idea: args.idea }).await
}
