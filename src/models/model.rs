// Loaded model handle

use std::path::PathBuf;

use super::architecture::{ArchitectureConfig, TaskHead};
use super::weights::ModelWeights;
use crate::config::Device;

/// Where a model was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Random init from the config of a hub model
    Fresh { base_model_id: String },
    /// Hugging Face Hub repository at a revision
    Hub { revision: String, path: PathBuf },
    /// Directory on disk
    Local { path: PathBuf },
    /// OpenAI-compatible API
    Api { base_url: String },
}

impl ModelSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelSource::Fresh { .. } => "fresh",
            ModelSource::Hub { .. } => "hub",
            ModelSource::Local { .. } => "local",
            ModelSource::Api { .. } => "api",
        }
    }
}

/// A loaded model ready to be benchmarked
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub model_id: String,
    pub source: ModelSource,
    /// Architecture as instantiated (head attached)
    pub architecture: ArchitectureConfig,
    pub head: TaskHead,
    /// Label names by class ID, empty for heads without labels
    pub id2label: Vec<String>,
    pub weights: ModelWeights,
    pub device: Device,
    /// Whether the model generates text; `None` until `load_model` classifies it
    pub is_generative: Option<bool>,
}

impl Model {
    pub fn new(
        model_id: impl Into<String>,
        source: ModelSource,
        architecture: ArchitectureConfig,
        head: TaskHead,
        weights: ModelWeights,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            source,
            architecture,
            head,
            id2label: Vec::new(),
            weights,
            device: Device::Cpu,
            is_generative: None,
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.id2label = labels;
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn num_labels(&self) -> usize {
        self.id2label.len()
    }

    /// Class ID of a label name
    pub fn label2id(&self, label: &str) -> Option<usize> {
        self.id2label.iter().position(|l| l.eq_ignore_ascii_case(label))
    }
}
