// Model loading
//
// Resolves a model type to its setup, delegates the load, and tags the
// returned model as generative or not. Errors from the setup are returned
// untouched.

use anyhow::Result;

use crate::config::{BenchmarkConfig, DatasetConfig, ModelConfig};
use crate::model_setups::{ModelSetup, ModelSetupKind, ModelType};
use crate::models::{model_is_generative, Model, Tokenizer};

/// Load a model and its tokenizer
///
/// Fails with `ModelLoadingError::UnknownModelType` when
/// `model_config.model_type` is not registered; every other error comes
/// straight from the selected setup.
pub async fn load_model(
    model_config: &ModelConfig,
    dataset_config: &DatasetConfig,
    benchmark_config: &BenchmarkConfig,
) -> Result<(Tokenizer, Model)> {
    load_model_with(model_config, dataset_config, benchmark_config, ModelSetupKind::new).await
}

/// Same as [`load_model`], with the setup constructor supplied by the caller
///
/// `build` is only called once the model type has been resolved.
pub async fn load_model_with<S, F>(
    model_config: &ModelConfig,
    dataset_config: &DatasetConfig,
    benchmark_config: &BenchmarkConfig,
    build: F,
) -> Result<(Tokenizer, Model)>
where
    S: ModelSetup,
    F: FnOnce(ModelType, &BenchmarkConfig) -> Result<S>,
{
    let model_type = ModelType::lookup(&model_config.model_type)?;
    let setup = build(model_type, benchmark_config)?;

    let (tokenizer, mut model) = setup.load_model(model_config, dataset_config).await?;
    model.is_generative = Some(model_is_generative(&model));

    Ok((tokenizer, model))
}
