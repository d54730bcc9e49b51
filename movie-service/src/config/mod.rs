use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default chat completions endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 150;

#[derive(Debug, Clone)]
pub struct MovieConfig {
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub mongodb: MongoConfig,
    pub openai: OpenAiSettings,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON array of movies loaded into the memory backend at startup.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub model: String,
    pub max_tokens: u32,
}

impl MovieConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(MovieConfig {
            common: common_config,
            store: StoreConfig {
                backend: get_env("STORE_BACKEND", Some("mongo"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                seed_path: env::var("STORE_SEED_PATH").ok(),
            },
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("movies_db"), is_prod)?,
                collection: get_env("MOVIES_COLLECTION", Some("Movies"), is_prod)?,
            },
            openai: OpenAiSettings {
                api_url: get_env("OPENAI_API_URL", Some(DEFAULT_OPENAI_API_URL), false)?,
                api_key: Secret::new(get_env("OPENAI_API_KEY", None, is_prod)?),
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), false)?,
                max_tokens: get_env(
                    "OPENAI_MAX_TOKENS",
                    Some(&DEFAULT_MAX_TOKENS.to_string()),
                    false,
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("OPENAI_MAX_TOKENS is invalid: {}", e))
                })?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
