// Architecture config (config.json) and task heads

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Class-name suffixes of architectures that generate text autoregressively
pub const GENERATIVE_SUFFIXES: [&str; 3] = ["ForCausalLM", "LMHeadModel", "ForConditionalGeneration"];

/// Suffixes stripped to recover the base architecture name
const HEAD_SUFFIXES: [&str; 8] = [
    "ForCausalLM",
    "LMHeadModel",
    "ForConditionalGeneration",
    "ForMaskedLM",
    "ForPreTraining",
    "ForSequenceClassification",
    "ForTokenClassification",
    "ForQuestionAnswering",
];

/// Output head attached to a model for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskHead {
    SequenceClassification,
    TokenClassification,
    QuestionAnswering,
    /// The model's own language modelling head
    Generation,
}

impl TaskHead {
    /// Class-name suffix of the head, `None` for generation
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            TaskHead::SequenceClassification => Some("ForSequenceClassification"),
            TaskHead::TokenClassification => Some("ForTokenClassification"),
            TaskHead::QuestionAnswering => Some("ForQuestionAnswering"),
            TaskHead::Generation => None,
        }
    }

    /// Whether the head predicts one of the dataset labels
    pub fn uses_labels(&self) -> bool {
        matches!(
            self,
            TaskHead::SequenceClassification | TaskHead::TokenClassification
        )
    }
}

impl fmt::Display for TaskHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskHead::SequenceClassification => "sequence-classification",
            TaskHead::TokenClassification => "token-classification",
            TaskHead::QuestionAnswering => "question-answering",
            TaskHead::Generation => "generation",
        };
        f.write_str(name)
    }
}

/// The subset of a Hugging Face `config.json` needed to place a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    /// Model classes, e.g. `["XLMRobertaForMaskedLM"]`
    #[serde(default)]
    pub architectures: Vec<String>,

    /// Family name, e.g. `"xlm-roberta"` or `"llama"`
    #[serde(default)]
    pub model_type: Option<String>,

    #[serde(default)]
    pub vocab_size: Option<usize>,

    #[serde(default)]
    pub max_position_embeddings: Option<usize>,

    #[serde(default)]
    pub is_encoder_decoder: bool,
}

impl ArchitectureConfig {
    /// Read `config.json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse model config {}", path.display()))
    }

    /// Whether the configured architecture generates text
    pub fn is_generative(&self) -> bool {
        self.is_encoder_decoder
            || self
                .architectures
                .iter()
                .any(|arch| is_generative_architecture(arch))
    }

    /// Architecture name without its head, e.g. `XLMRoberta`
    pub fn base_name(&self) -> Option<&str> {
        let arch = self.architectures.first()?;
        let base = HEAD_SUFFIXES
            .iter()
            .find_map(|suffix| arch.strip_suffix(suffix))
            .unwrap_or(arch.as_str());
        Some(base.strip_suffix("Model").unwrap_or(base))
    }

    /// Architecture list after attaching `head`
    pub fn with_head(&self, head: TaskHead) -> Vec<String> {
        match (head.suffix(), self.base_name()) {
            (Some(suffix), Some(base)) => vec![format!("{}{}", base, suffix)],
            _ => self.architectures.clone(),
        }
    }
}

/// Whether a class name belongs to a generative architecture
pub fn is_generative_architecture(name: &str) -> bool {
    GENERATIVE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}
