// OpenAI API model setup
//
// Works for OpenAI and any endpoint exposing the same `/v1/models` API.
// Loading verifies the model exists; no completions are requested here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::ModelSetup;
use crate::config::{BenchmarkConfig, DatasetConfig, ModelConfig};
use crate::errors::ModelLoadingError;
use crate::models::{ApiTokenizer, ArchitectureConfig, Model, ModelSource, ModelWeights, TaskHead, Tokenizer};

const PROVIDER: &str = "OpenAI";

/// Model object returned by `GET /v1/models/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiModelInfo {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub created: Option<u64>,
}

/// Sets up models served by an OpenAI-compatible API
#[derive(Clone)]
pub struct OpenAiModelSetup {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiModelSetup {
    pub fn new(benchmark_config: &BenchmarkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(benchmark_config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: benchmark_config.openai_api_key.clone(),
            base_url: benchmark_config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up a model on the endpoint
    pub async fn retrieve_model(&self, model_id: &str) -> Result<OpenAiModelInfo> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ModelLoadingError::authentication(PROVIDER, "no API key configured (set OPENAI_API_KEY)"))?;

        let url = format!("{}/v1/models/{}", self.base_url, model_id);
        tracing::debug!("Checking model availability at {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(ModelLoadingError::authentication(PROVIDER, format!("{}: {}", status, body)).into())
            }
            StatusCode::NOT_FOUND => Err(ModelLoadingError::model_not_found(
                model_id,
                format!("{} does not serve this model", self.base_url),
            )
            .into()),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("{} API error {} for model {}: {}", PROVIDER, status, model_id, body)
            }
            _ => response
                .json::<OpenAiModelInfo>()
                .await
                .context("Failed to parse model info"),
        }
    }
}

#[async_trait]
impl ModelSetup for OpenAiModelSetup {
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)> {
        let info = self.retrieve_model(&model_config.model_id).await?;
        tracing::info!(
            "Using {} model {} (owned by {})",
            PROVIDER,
            info.id,
            info.owned_by.as_deref().unwrap_or("unknown")
        );

        let tokenizer = ApiTokenizer::for_model(&model_config.model_id);
        if dataset_config.max_generated_tokens >= tokenizer.context_window {
            tracing::warn!(
                "{} generates up to {} tokens but {} only has a {} token context window",
                dataset_config.name,
                dataset_config.max_generated_tokens,
                model_config.model_id,
                tokenizer.context_window
            );
        }

        let architecture = ArchitectureConfig {
            model_type: Some("openai".to_string()),
            max_position_embeddings: Some(tokenizer.context_window),
            ..Default::default()
        };
        let model = Model::new(
            model_config.model_id.clone(),
            ModelSource::Api {
                base_url: self.base_url.clone(),
            },
            architecture,
            TaskHead::Generation,
            ModelWeights::Remote,
        );

        Ok((Tokenizer::Api(tokenizer), model))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
