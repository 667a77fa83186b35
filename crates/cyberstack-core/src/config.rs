use crate::error::Result;
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// GenAiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the hosted generation API. The key itself is
/// never stored in config — only the name of the environment variable that
/// holds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenAiConfig {
    #[serde(default = "default_genai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_genai_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_genai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_genai_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GENAI_API_KEY".to_string()
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_genai_endpoint(),
            model: default_genai_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4242
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// The account that can never be deleted through user administration.
    #[serde(default = "default_primary_admin")]
    pub primary_admin_email: String,
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_primary_admin() -> String {
    "admin@cyberstack.ai".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_admin_email: default_primary_admin(),
            genai: GenAiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `.cyberstack/config.yaml`; an absent file yields
    /// the defaults.
    pub fn load(root: &Path) -> Result<Config> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
