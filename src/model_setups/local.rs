// Local filesystem model setup

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use super::common::assemble_model;
use super::ModelSetup;
use crate::config::{BenchmarkConfig, DatasetConfig, ModelConfig};
use crate::errors::ModelLoadingError;
use crate::models::{Model, ModelSource, ModelWeights, Tokenizer, WeightsSummary};

/// Loads models from a directory on disk; the model ID is the path
#[derive(Debug, Clone)]
pub struct LocalModelSetup {
    benchmark_config: BenchmarkConfig,
}

impl LocalModelSetup {
    pub fn new(benchmark_config: &BenchmarkConfig) -> Self {
        Self {
            benchmark_config: benchmark_config.clone(),
        }
    }
}

#[async_trait]
impl ModelSetup for LocalModelSetup {
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)> {
        let path = PathBuf::from(&model_config.model_id);
        if !path.is_dir() {
            return Err(ModelLoadingError::model_not_found(
                &model_config.model_id,
                format!("{} is not a directory", path.display()),
            )
            .into());
        }

        tracing::info!("Loading local model from {}", path.display());

        assemble_model(
            &model_config.model_id,
            &path,
            dataset_config,
            ModelSource::Local { path: path.clone() },
            self.benchmark_config.device.resolve(),
            |dir| Ok(ModelWeights::Safetensors(WeightsSummary::from_dir(dir)?)),
        )
    }

    fn name(&self) -> &str {
        "local"
    }
}
