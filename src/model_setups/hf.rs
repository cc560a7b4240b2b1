// Hugging Face Hub model setup

use anyhow::Result;
use async_trait::async_trait;

use super::common::assemble_model;
use super::download::HubDownloader;
use super::ModelSetup;
use crate::config::{BenchmarkConfig, DatasetConfig, ModelConfig};
use crate::models::{Model, ModelSource, ModelWeights, Tokenizer, WeightsSummary};

/// Loads models hosted on the Hugging Face Hub
#[derive(Debug, Clone)]
pub struct HfModelSetup {
    benchmark_config: BenchmarkConfig,
}

impl HfModelSetup {
    pub fn new(benchmark_config: &BenchmarkConfig) -> Self {
        Self {
            benchmark_config: benchmark_config.clone(),
        }
    }
}

#[async_trait]
impl ModelSetup for HfModelSetup {
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)> {
        let downloader = HubDownloader::for_model(&self.benchmark_config, model_config)?;

        let dir = downloader
            .download_model(&model_config.model_id, &model_config.revision, true)
            .await?;

        assemble_model(
            &model_config.model_id,
            &dir,
            dataset_config,
            ModelSource::Hub {
                revision: model_config.revision.clone(),
                path: dir.clone(),
            },
            self.benchmark_config.device.resolve(),
            |dir| Ok(ModelWeights::Safetensors(WeightsSummary::from_dir(dir)?)),
        )
    }

    fn name(&self) -> &str {
        "hf"
    }
}
