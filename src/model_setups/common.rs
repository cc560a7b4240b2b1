// Shared assembly of a model from a directory of Hugging Face files

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{DatasetConfig, Device, Task};
use crate::errors::ModelLoadingError;
use crate::models::tokenizer::TOKENIZER_FILE;
use crate::models::{ArchitectureConfig, HfTokenizer, Model, ModelSource, ModelWeights, TaskHead, Tokenizer};

pub const CONFIG_FILE: &str = "config.json";

/// Pick the head a model needs for a task.
///
/// Generative architectures keep their own head. Encoders get the task's
/// head, and fail if the task can only be solved by generating text.
pub fn select_head(model_id: &str, architecture: &ArchitectureConfig, task: Task) -> Result<TaskHead, ModelLoadingError> {
    if architecture.is_generative() {
        return Ok(TaskHead::Generation);
    }

    task.encoder_head().ok_or_else(|| ModelLoadingError::UnsupportedTask {
        model_id: model_id.to_string(),
        task: task.to_string(),
    })
}

/// Build the tokenizer and model from `dir`
///
/// `load_weights` runs only after the head has been validated, so an
/// unsupported task fails before any weights are read.
pub fn assemble_model<F>(
    model_id: &str,
    dir: &Path,
    dataset_config: &DatasetConfig,
    source: ModelSource,
    device: Device,
    load_weights: F,
) -> Result<(Tokenizer, Model)>
where
    F: FnOnce(&Path) -> Result<ModelWeights>,
{
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Err(ModelLoadingError::invalid_model(
            model_id,
            format!("no {} in {}", CONFIG_FILE, dir.display()),
        )
        .into());
    }
    if !dir.join(TOKENIZER_FILE).exists() {
        return Err(ModelLoadingError::invalid_model(
            model_id,
            format!("no {} in {}", TOKENIZER_FILE, dir.display()),
        )
        .into());
    }

    let base_architecture = ArchitectureConfig::from_file(&config_path)?;
    let head = select_head(model_id, &base_architecture, dataset_config.task)?;

    let tokenizer = HfTokenizer::from_dir(dir)
        .with_context(|| format!("Failed to load tokenizer for {}", model_id))?;

    let weights = load_weights(dir).with_context(|| format!("Failed to load weights for {}", model_id))?;

    let architecture = ArchitectureConfig {
        architectures: base_architecture.with_head(head),
        ..base_architecture
    };

    let labels = if head.uses_labels() {
        dataset_config.labels.clone()
    } else {
        Vec::new()
    };

    tracing::info!(
        "Loaded {} as {} ({} head, {} labels)",
        model_id,
        architecture.architectures.join(", "),
        head,
        labels.len()
    );

    let model = Model::new(model_id, source, architecture, head, weights)
        .with_labels(labels)
        .with_device(device);

    Ok((Tokenizer::HuggingFace(tokenizer), model))
}
