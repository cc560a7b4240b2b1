// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::backend::Device;
use super::task::Task;
use crate::model_setups::ModelType;

pub const DEFAULT_REVISION: &str = "main";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Which model to load and how to find it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Hub repository ID, local directory, fresh model ID or API model name
    pub model_id: String,

    /// Hub revision (branch, tag or commit)
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Loading strategy tag ("fresh", "hf", "local", "openai").
    ///
    /// Kept as a string: it is validated against the registry when the
    /// model is loaded, not when the config is parsed.
    pub model_type: String,

    /// Languages the model supports (informational)
    #[serde(default)]
    pub languages: Vec<String>,

    /// Override for the directory downloaded models are cached in
    #[serde(default)]
    pub model_cache_dir: Option<PathBuf>,
}

fn default_revision() -> String {
    DEFAULT_REVISION.to_string()
}

impl ModelConfig {
    /// Create a config from a model ID
    ///
    /// Hub model IDs may carry an `id@revision` suffix. Other model types
    /// keep the ID verbatim, since a local path can contain `@`.
    pub fn new(model_id: impl Into<String>, model_type: impl Into<String>) -> Self {
        let model_id = model_id.into();
        let model_type = model_type.into();

        let is_hub = matches!(ModelType::lookup(&model_type), Ok(ModelType::Hf));
        let (model_id, revision) = match model_id.split_once('@') {
            Some((id, rev)) if is_hub && !id.is_empty() && !rev.is_empty() => (id.to_string(), rev.to_string()),
            _ => (model_id, default_revision()),
        };

        Self {
            model_id,
            revision,
            model_type,
            languages: Vec::new(),
            model_cache_dir: None,
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_cache_dir = Some(dir.into());
        self
    }
}

/// The dataset a model is being loaded for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Short dataset name (e.g. "angry-tweets")
    pub name: String,

    /// Hub ID of the dataset
    #[serde(default)]
    pub huggingface_id: String,

    pub task: Task,

    #[serde(default)]
    pub languages: Vec<String>,

    /// Label names; index is the class ID used by classification heads
    #[serde(default)]
    pub labels: Vec<String>,

    /// Generation budget for generative models
    #[serde(default = "default_max_generated_tokens")]
    pub max_generated_tokens: usize,

    #[serde(default)]
    pub num_few_shot_examples: usize,
}

fn default_max_generated_tokens() -> usize {
    256
}

impl DatasetConfig {
    pub fn new(name: impl Into<String>, task: Task) -> Self {
        Self {
            name: name.into(),
            huggingface_id: String::new(),
            task,
            languages: Vec::new(),
            labels: Vec::new(),
            max_generated_tokens: default_max_generated_tokens(),
            num_few_shot_examples: 0,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Process-wide settings shared by every model setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Root cache directory; hub downloads go to `<cache_dir>/model_cache`
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Hugging Face access token for private or gated models
    #[serde(default)]
    pub hf_token: Option<String>,

    /// Hub mirror to download from instead of huggingface.co
    #[serde(default)]
    pub hf_endpoint: Option<String>,

    /// API key for the OpenAI-compatible endpoint
    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default)]
    pub device: Device,

    /// Seed for randomly initialised models; drawn at random when unset
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_true")]
    pub progress_bar: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("scandeval"))
        .unwrap_or_else(|| PathBuf::from(".scandeval_cache"))
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            hf_token: None,
            hf_endpoint: None,
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            device: Device::default(),
            seed: None,
            progress_bar: true,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BenchmarkConfig {
    /// Directory hub models are cached in, honouring a per-model override
    pub fn model_cache_dir(&self, model_config: &ModelConfig) -> PathBuf {
        model_config
            .model_cache_dir
            .clone()
            .unwrap_or_else(|| self.cache_dir.join("model_cache"))
    }
}
