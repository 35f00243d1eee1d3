use serde::Deserialize;
use tracing::info;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{
            ApiConfigResponse, ClearProviderKeyResponse, ListModelsResponse, Provider,
            SetProviderKeyResponse, SettingEntry, TestConnectionResponse,
        },
    },
    db::repositories::settings::{self, GEMINI_MODEL_KEY},
    generation::GenerationCredentials,
    providers::gemini::{DEFAULT_MODEL, KNOWN_MODELS},
    security::keyring,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProviderKeyArgs {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetModelArgs {
    pub model: String,
}

fn default_provider() -> Provider {
    Provider::Gemini
}

pub async fn selected_model(state: &AppState) -> AppResult<String> {
    let stored = settings::get_setting(state.db.pool(), GEMINI_MODEL_KEY).await?;
    Ok(stored
        .map(|entry| entry.value)
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string()))
}

/// Key from the OS keyring plus the stored model choice.
pub async fn resolve_credentials(state: &AppState) -> AppResult<GenerationCredentials> {
    let api_key = keyring::get_provider_key(Provider::Gemini)?;
    let model = selected_model(state).await?;
    Ok(GenerationCredentials { api_key, model })
}

pub async fn set_provider_key(
    _state: &AppState,
    args: SetProviderKeyArgs,
) -> AppResult<SetProviderKeyResponse> {
    if args.api_key.trim().is_empty() {
        return Err(AppError::InvalidInput("api key cannot be empty".to_string()));
    }
    keyring::set_provider_key(args.provider, args.api_key.trim())?;
    info!("provider key stored");
    Ok(SetProviderKeyResponse { stored: true })
}

pub async fn clear_provider_key(_state: &AppState) -> AppResult<ClearProviderKeyResponse> {
    let removed = keyring::delete_provider_key(Provider::Gemini)?;
    Ok(ClearProviderKeyResponse { removed })
}

pub async fn get_api_config(state: &AppState) -> AppResult<ApiConfigResponse> {
    Ok(ApiConfigResponse {
        provider: Provider::Gemini,
        has_api_key: keyring::has_provider_key(Provider::Gemini),
        model: selected_model(state).await?,
        default_model: DEFAULT_MODEL.to_string(),
    })
}

pub async fn set_model(state: &AppState, args: SetModelArgs) -> AppResult<SettingEntry> {
    let model = args.model.trim();
    if model.is_empty() {
        return Err(AppError::InvalidInput("model name cannot be empty".to_string()));
    }
    let entry = settings::set_setting(state.db.pool(), GEMINI_MODEL_KEY, model).await?;
    info!(model, "model selected");
    Ok(entry)
}

pub async fn list_models(state: &AppState) -> AppResult<ListModelsResponse> {
    Ok(ListModelsResponse {
        models: KNOWN_MODELS.iter().map(ToString::to_string).collect(),
        selected: selected_model(state).await?,
    })
}

pub async fn test_connection(state: &AppState) -> AppResult<TestConnectionResponse> {
    let credentials = resolve_credentials(state).await?;
    let preview = state.gemini.test_connection(&credentials).await?;
    Ok(TestConnectionResponse {
        model: credentials.model,
        preview,
    })
}
