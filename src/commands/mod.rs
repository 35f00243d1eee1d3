pub mod documents;
pub mod editing;
pub mod generation;
pub mod session;
pub mod settings;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{
    core::errors::{AppError, AppResult},
    AppState,
};

fn parse_args<T: DeserializeOwned>(args: Value) -> AppResult<T> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|err| AppError::InvalidInput(format!("invalid arguments: {err}")))
}

fn respond<T: Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|err| AppError::Internal(format!("failed to encode response: {err}")))
}

/// Routes one named command to its handler.
pub async fn dispatch(state: &AppState, command: &str, args: Value) -> AppResult<Value> {
    match command {
        "get_session" => respond(session::get_session(state).await),
        "select_studio" => respond(session::select_studio(state, parse_args(args)?).await?),
        "go_home" => respond(session::go_home(state).await?),
        "clear_project" => respond(session::clear_project(state).await?),

        "upload_document" => respond(documents::upload_document(state, parse_args(args)?).await?),
        "load_document_text" => respond(documents::load_document_text(state, parse_args(args)?).await?),
        "export_document" => respond(documents::export_document(state, parse_args(args)?).await?),
        "remove_shot" => respond(documents::remove_shot(state, parse_args(args)?).await?),

        "open_prompt_editor" => respond(editing::open_prompt_editor(state, parse_args(args)?).await?),
        "update_prompt_field" => respond(editing::update_prompt_field(state, parse_args(args)?).await?),
        "save_prompt_edit" => respond(editing::save_prompt_edit(state).await?),
        "discard_prompt_edit" => respond(editing::discard_prompt_edit(state).await?),

        "generate_storyboard" => respond(generation::generate_storyboard(state, parse_args(args)?).await?),
        "generate_video_prompts" => respond(generation::generate_video_prompts(state).await?),
        "generate_audio_prompts" => respond(generation::generate_audio_prompts(state, parse_args(args)?).await?),
        "generate_additional_shot" => {
            respond(generation::generate_additional_shot(state, parse_args(args)?).await?)
        }

        "set_provider_key" => respond(settings::set_provider_key(state, parse_args(args)?).await?),
        "clear_provider_key" => respond(settings::clear_provider_key(state).await?),
        "get_api_config" => respond(settings::get_api_config(state).await?),
        "set_model" => respond(settings::set_model(state, parse_args(args)?).await?),
        "list_models" => respond(settings::list_models(state).await?),
        "test_connection" => respond(settings::test_connection(state).await?),

        other => Err(AppError::InvalidInput(format!("unknown command {other}"))),
    }
}
