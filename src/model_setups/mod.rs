// Model setups
//
// One loading strategy per model type. The set is closed: `ModelType` is
// the registry of discriminator tags and `ModelSetupKind` holds the
// strategy built for one of them.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::config::{BenchmarkConfig, DatasetConfig, ModelConfig};
use crate::errors::ModelLoadingError;
use crate::models::{Model, Tokenizer};

pub mod common;
pub mod download;
pub mod fresh;
pub mod hf;
pub mod local;
pub mod openai;

pub use download::HubDownloader;
pub use fresh::FreshModelSetup;
pub use hf::HfModelSetup;
pub use local::LocalModelSetup;
pub use openai::OpenAiModelSetup;

/// A way of obtaining a (tokenizer, model) pair
///
/// Implementations are built from a `BenchmarkConfig` and must not retain
/// per-load state, so one setup can serve concurrent loads.
#[async_trait]
pub trait ModelSetup: Send + Sync {
    /// Load the tokenizer and model described by `model_config`, shaped for `dataset_config`
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)>;

    /// Registry tag of this setup
    fn name(&self) -> &str;
}

/// Registered model type discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Randomly initialised model
    Fresh,
    /// Hugging Face Hub model
    Hf,
    /// Model directory on disk
    Local,
    /// OpenAI-compatible API model
    OpenAi,
}

impl ModelType {
    pub const ALL: [ModelType; 4] = [ModelType::Fresh, ModelType::Hf, ModelType::Local, ModelType::OpenAi];

    /// Canonical tag
    pub fn tag(&self) -> &'static str {
        match self {
            ModelType::Fresh => "fresh",
            ModelType::Hf => "hf",
            ModelType::Local => "local",
            ModelType::OpenAi => "openai",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ModelType::Hf => &["hub"],
            ModelType::OpenAi => &["remote-api"],
            ModelType::Fresh | ModelType::Local => &[],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ModelType::Fresh => "Randomly initialised model with a Hub architecture",
            ModelType::Hf => "Model hosted on the Hugging Face Hub",
            ModelType::Local => "Model directory on disk",
            ModelType::OpenAi => "Model served by an OpenAI-compatible API",
        }
    }

    /// Canonical tags of every registered type
    pub fn tags() -> Vec<&'static str> {
        Self::ALL.iter().map(ModelType::tag).collect()
    }

    /// Resolve a discriminator tag by exact match; there is no fallback type
    pub fn lookup(tag: &str) -> Result<Self, ModelLoadingError> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.tag() == tag || ty.aliases().contains(&tag))
            .ok_or_else(|| ModelLoadingError::unknown_model_type(tag))
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ModelType {
    type Err = ModelLoadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

/// The setup built for one model type
pub enum ModelSetupKind {
    Fresh(FreshModelSetup),
    Hf(HfModelSetup),
    Local(LocalModelSetup),
    OpenAi(OpenAiModelSetup),
}

impl ModelSetupKind {
    /// Build the setup registered for `model_type`
    pub fn new(model_type: ModelType, benchmark_config: &BenchmarkConfig) -> Result<Self> {
        Ok(match model_type {
            ModelType::Fresh => Self::Fresh(FreshModelSetup::new(benchmark_config)),
            ModelType::Hf => Self::Hf(HfModelSetup::new(benchmark_config)),
            ModelType::Local => Self::Local(LocalModelSetup::new(benchmark_config)),
            ModelType::OpenAi => Self::OpenAi(OpenAiModelSetup::new(benchmark_config)?),
        })
    }

    pub fn model_type(&self) -> ModelType {
        match self {
            Self::Fresh(_) => ModelType::Fresh,
            Self::Hf(_) => ModelType::Hf,
            Self::Local(_) => ModelType::Local,
            Self::OpenAi(_) => ModelType::OpenAi,
        }
    }

    fn setup(&self) -> &dyn ModelSetup {
        match self {
            Self::Fresh(setup) => setup,
            Self::Hf(setup) => setup,
            Self::Local(setup) => setup,
            Self::OpenAi(setup) => setup,
        }
    }
}

#[async_trait]
impl ModelSetup for ModelSetupKind {
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)> {
        let setup = self.setup();
        tracing::debug!("Loading {} with the {} setup", model_config.model_id, setup.name());
        setup.load_model(model_config, dataset_config).await
    }

    fn name(&self) -> &str {
        self.setup().name()
    }
}
