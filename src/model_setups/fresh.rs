// Fresh (randomly initialised) model setup
//
// A fresh model borrows the architecture config and tokenizer of a base
// model on the Hub but none of its weights.

use anyhow::Result;
use async_trait::async_trait;

use super::common::assemble_model;
use super::download::HubDownloader;
use super::ModelSetup;
use crate::config::{BenchmarkConfig, DatasetConfig, ModelConfig, DEFAULT_REVISION};
use crate::errors::ModelLoadingError;
use crate::models::{Model, ModelSource, ModelWeights, Tokenizer};

/// Fresh model IDs and the Hub model each one is initialised from
pub const FRESH_MODELS: [(&str, &str); 2] = [
    ("fresh-xlm-roberta-base", "xlm-roberta-base"),
    ("fresh-electra-small", "google/electra-small-discriminator"),
];

/// Base Hub model of a fresh model ID
pub fn base_model_id(model_id: &str) -> Result<&'static str, ModelLoadingError> {
    FRESH_MODELS
        .iter()
        .find(|(fresh_id, _)| *fresh_id == model_id)
        .map(|(_, base)| *base)
        .ok_or_else(|| {
            let known: Vec<&str> = FRESH_MODELS.iter().map(|(id, _)| *id).collect();
            ModelLoadingError::invalid_model(
                model_id,
                format!("not a known fresh model (known: {})", known.join(", ")),
            )
        })
}

/// Builds randomly initialised models
#[derive(Debug, Clone)]
pub struct FreshModelSetup {
    benchmark_config: BenchmarkConfig,
}

impl FreshModelSetup {
    pub fn new(benchmark_config: &BenchmarkConfig) -> Self {
        Self {
            benchmark_config: benchmark_config.clone(),
        }
    }

    fn seed(&self) -> u64 {
        self.benchmark_config.seed.unwrap_or_else(|| {
            let seed = rand::random();
            tracing::info!("No seed configured, initialising with seed {}", seed);
            seed
        })
    }
}

#[async_trait]
impl ModelSetup for FreshModelSetup {
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)> {
        let base = base_model_id(&model_config.model_id)?;

        let downloader = HubDownloader::for_model(&self.benchmark_config, model_config)?;
        let dir = downloader.download_model(base, DEFAULT_REVISION, false).await?;

        let seed = self.seed();
        assemble_model(
            &model_config.model_id,
            &dir,
            dataset_config,
            ModelSource::Fresh {
                base_model_id: base.to_string(),
            },
            self.benchmark_config.device.resolve(),
            |_| Ok(ModelWeights::RandomInit { seed }),
        )
    }

    fn name(&self) -> &str {
        "fresh"
    }
}
