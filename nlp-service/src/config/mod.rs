use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct NlpConfig {
    pub common: core_config::Config,
    pub model: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Directory scanned once at startup for model artifacts.
    pub directory: String,
    /// Name of the file inside `directory` that pins the artifact to load.
    pub pointer_file: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            directory: "models".to_string(),
            pointer_file: "LATEST".to_string(),
        }
    }
}

impl NlpConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(NlpConfig {
            common: common_config,
            model: ModelConfig {
                directory: get_env("MODEL_DIRECTORY", Some("models"), is_prod)?,
                pointer_file: get_env("MODEL_POINTER_FILE", Some("LATEST"), false)?,
            },
        })
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
