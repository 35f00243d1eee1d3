use crate::core::{
    errors::{AppError, AppResult},
    types::Provider,
};

const SERVICE: &str = "storyboard-studio";

fn username_for_provider(provider: &Provider) -> &'static str {
    match provider {
        Provider::Gemini => "gemini",
    }
}

fn entry_for(provider: &Provider) -> AppResult<keyring::Entry> {
    keyring::Entry::new(SERVICE, username_for_provider(provider))
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn set_provider_key(provider: Provider, api_key: &str) -> AppResult<()> {
    entry_for(&provider)?
        .set_password(api_key)
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn get_provider_key(provider: Provider) -> AppResult<String> {
    match entry_for(&provider)?.get_password() {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        Ok(_) | Err(keyring::Error::NoEntry) => Err(AppError::CredentialsMissing),
        Err(err) => Err(AppError::Internal(err.to_string())),
    }
}

pub fn has_provider_key(provider: Provider) -> bool {
    get_provider_key(provider).is_ok()
}

/// Removing a key that was never stored is not an error.
pub fn delete_provider_key(provider: Provider) -> AppResult<bool> {
    match entry_for(&provider)?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(err) => Err(AppError::Internal(err.to_string())),
    }
}
