// Configuration loader
// Loads benchmark settings from ~/.scandeval/config.toml, then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::BenchmarkConfig;

/// Load benchmark configuration from a config file and the environment
///
/// `path` overrides the default `~/.scandeval/config.toml`. A missing default
/// file is fine (defaults are used); a missing explicit file is an error.
pub fn load_benchmark_config(path: Option<&Path>) -> Result<BenchmarkConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_benchmark_config(&contents)?
        }
        None => match default_config_path() {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                parse_benchmark_config(&contents)?
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                BenchmarkConfig::default()
            }
        },
    };

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scandeval/config.toml"))
}

/// Parse a TOML benchmark config; every key is optional
pub fn parse_benchmark_config(contents: &str) -> Result<BenchmarkConfig> {
    toml::from_str(contents).context("Failed to parse config.toml")
}

/// Fill credentials and endpoints from the environment.
///
/// Environment values win over the file, except that empty values are ignored.
pub fn apply_env_overrides<F>(mut config: BenchmarkConfig, lookup: F) -> BenchmarkConfig
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(token) = lookup("HUGGINGFACE_API_KEY").or_else(|| lookup("HF_TOKEN")) {
        config.hf_token = Some(token);
    }
    if let Some(endpoint) = lookup("HF_ENDPOINT") {
        config.hf_endpoint = Some(endpoint);
    }
    if let Some(api_key) = lookup("OPENAI_API_KEY") {
        config.openai_api_key = Some(api_key);
    }
    if let Some(base_url) = lookup("OPENAI_BASE_URL") {
        config.openai_base_url = base_url;
    }
    if let Some(cache_dir) = lookup("SCANDEVAL_CACHE_DIR") {
        config.cache_dir = PathBuf::from(cache_dir);
    }

    config
}
