pub mod auth;
pub mod board;
pub mod chat;
pub mod events;
pub mod learning;
pub mod my_tasks;
pub mod reports;
pub mod state;
pub mod teams;
pub mod toolkit;
pub mod users;

use crate::error::AppError;
use cyberstack_core::config::Config;
use genai_flows::GenClient;

/// Build a generation client from the platform config. Fails fast when the
/// key environment variable is unset.
pub(crate) fn gen_client(config: &Config) -> Result<GenClient, AppError> {
    GenClient::from_env(
        &config.genai.endpoint,
        &config.genai.model,
        &config.genai.api_key_env,
    )
    .map_err(Into::into)
}
