// Test model type dispatch
//
// This test suite verifies that:
// 1. Each model type dispatches to its own setup exactly once
// 2. Configs are forwarded to the setup unchanged
// 3. Unknown model types fail before any setup is built
// 4. The returned model is tagged with its generative classification
// 5. Setup errors come back unmodified

use anyhow::Result;
use async_trait::async_trait;
use scandeval::config::{BenchmarkConfig, DatasetConfig, ModelConfig, Task};
use scandeval::models::{
    ApiTokenizer, ArchitectureConfig, ModelSource, ModelWeights, TaskHead,
};
use scandeval::{load_model, load_model_with, model_is_generative, Model, ModelLoadingError, ModelSetup, ModelType, Tokenizer};
use std::sync::{Arc, Mutex};

/// Mock setup that records every call and returns a canned outcome
#[derive(Clone)]
struct RecordingSetup {
    calls: Arc<Mutex<Vec<(ModelConfig, DatasetConfig)>>>,
    outcome: Result<Model, ModelLoadingError>,
}

impl RecordingSetup {
    fn returning(model: Model) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome: Ok(model),
        }
    }

    fn failing(error: ModelLoadingError) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome: Err(error),
        }
    }

    fn calls(&self) -> Vec<(ModelConfig, DatasetConfig)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelSetup for RecordingSetup {
    async fn load_model(&self, model_config: &ModelConfig, dataset_config: &DatasetConfig) -> Result<(Tokenizer, Model)> {
        self.calls
            .lock()
            .unwrap()
            .push((model_config.clone(), dataset_config.clone()));

        match &self.outcome {
            Ok(model) => Ok((Tokenizer::Api(ApiTokenizer::for_model(&model.model_id)), model.clone())),
            Err(e) => Err(e.clone().into()),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn encoder_model(id: &str) -> Model {
    let architecture = ArchitectureConfig {
        architectures: vec!["XLMRobertaForSequenceClassification".to_string()],
        model_type: Some("xlm-roberta".to_string()),
        ..Default::default()
    };
    Model::new(
        id,
        ModelSource::Fresh {
            base_model_id: "xlm-roberta-base".to_string(),
        },
        architecture,
        TaskHead::SequenceClassification,
        ModelWeights::RandomInit { seed: 4242 },
    )
    .with_labels(vec!["negative".to_string(), "positive".to_string()])
}

fn decoder_model(id: &str) -> Model {
    let architecture = ArchitectureConfig {
        architectures: vec!["LlamaForCausalLM".to_string()],
        ..Default::default()
    };
    Model::new(
        id,
        ModelSource::Local {
            path: "/models/llama".into(),
        },
        architecture,
        TaskHead::Generation,
        ModelWeights::Remote,
    )
}

fn dataset() -> DatasetConfig {
    DatasetConfig::new("angry-tweets", Task::TextClassification).with_labels(["negative", "positive"])
}

#[tokio::test]
async fn test_each_model_type_dispatches_once_with_forwarded_configs() -> Result<()> {
    let tags = [("fresh", ModelType::Fresh), ("hf", ModelType::Hf), ("local", ModelType::Local), ("openai", ModelType::OpenAi)];

    for (tag, expected_type) in tags {
        let setup = RecordingSetup::returning(encoder_model("model"));
        let built_with = Arc::new(Mutex::new(Vec::new()));

        let model_config = ModelConfig::new("org/model@v2", tag);
        let dataset_config = dataset();
        let benchmark_config = BenchmarkConfig {
            seed: Some(7),
            ..Default::default()
        };

        let recorder = built_with.clone();
        let factory_setup = setup.clone();
        load_model_with(&model_config, &dataset_config, &benchmark_config, |model_type, config| {
            recorder.lock().unwrap().push((model_type, config.seed));
            Ok(factory_setup)
        })
        .await?;

        assert_eq!(*built_with.lock().unwrap(), vec![(expected_type, Some(7))]);

        let calls = setup.calls();
        assert_eq!(calls.len(), 1, "setup for '{}' should be called once", tag);
        assert_eq!(calls[0].0, model_config);
        assert_eq!(calls[0].1, dataset_config);
    }

    Ok(())
}

#[tokio::test]
async fn test_unknown_model_type_builds_no_setup() {
    let setup = RecordingSetup::returning(encoder_model("model"));
    let built = Arc::new(Mutex::new(0));

    let counter = built.clone();
    let factory_setup = setup.clone();
    let result = load_model_with(
        &ModelConfig::new("org/model", "unsupported-tag"),
        &dataset(),
        &BenchmarkConfig::default(),
        |_, _| {
            *counter.lock().unwrap() += 1;
            Ok(factory_setup)
        },
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ModelLoadingError>(),
        Some(&ModelLoadingError::unknown_model_type("unsupported-tag"))
    );
    assert_eq!(*built.lock().unwrap(), 0);
    assert!(setup.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_model_type_with_builtin_setups() {
    let err = load_model(
        &ModelConfig::new("org/model", "unsupported-tag"),
        &dataset(),
        &BenchmarkConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ModelLoadingError>(),
        Some(ModelLoadingError::UnknownModelType { .. })
    ));
}

#[tokio::test]
async fn test_fresh_encoder_is_tagged_non_generative() -> Result<()> {
    let setup = RecordingSetup::returning(encoder_model("fresh-xlm-roberta-base"));

    let (_, model) = load_model_with(
        &ModelConfig::new("fresh-xlm-roberta-base", "fresh"),
        &dataset(),
        &BenchmarkConfig::default(),
        |_, _| Ok(setup),
    )
    .await?;

    assert_eq!(model.is_generative, Some(false));
    Ok(())
}

#[tokio::test]
async fn test_generative_flag_matches_classifier_for_every_type() -> Result<()> {
    for model_type in ModelType::ALL {
        for expected in [encoder_model("m"), decoder_model("m")] {
            let setup = RecordingSetup::returning(expected.clone());

            let (_, model) = load_model_with(
                &ModelConfig::new("m", model_type.tag()),
                &dataset(),
                &BenchmarkConfig::default(),
                |_, _| Ok(setup),
            )
            .await?;

            assert_eq!(model.is_generative, Some(model_is_generative(&expected)));
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_returned_pair_is_the_setup_output() -> Result<()> {
    let expected = decoder_model("meta-llama/Llama-3.2-1B");
    let setup = RecordingSetup::returning(expected.clone());

    let (tokenizer, model) = load_model_with(
        &ModelConfig::new("meta-llama/Llama-3.2-1B", "hf"),
        &dataset(),
        &BenchmarkConfig::default(),
        |_, _| Ok(setup),
    )
    .await?;

    // Only the generative flag differs from what the setup returned
    let Model { is_generative, .. } = &model;
    assert_eq!(*is_generative, Some(true));
    assert_eq!(
        Model {
            is_generative: None,
            ..model.clone()
        },
        expected
    );

    match tokenizer {
        Tokenizer::Api(api) => assert_eq!(api, ApiTokenizer::for_model("meta-llama/Llama-3.2-1B")),
        Tokenizer::HuggingFace(_) => panic!("unexpected tokenizer variant"),
    }
    Ok(())
}

#[tokio::test]
async fn test_setup_error_is_returned_unmodified() {
    let auth_error = ModelLoadingError::authentication("OpenAI", "401 Unauthorized: invalid key");
    let setup = RecordingSetup::failing(auth_error.clone());

    let err = load_model_with(
        &ModelConfig::new("gpt-4o", "remote-api"),
        &dataset(),
        &BenchmarkConfig::default(),
        |_, _| Ok(setup),
    )
    .await
    .unwrap_err();

    assert_eq!(err.downcast_ref::<ModelLoadingError>(), Some(&auth_error));
    // No context layered on top
    assert_eq!(format!("{:#}", err), auth_error.to_string());
    assert_eq!(err.chain().count(), 1);
}

#[tokio::test]
async fn test_setup_construction_error_is_returned_unmodified() {
    let err = load_model_with::<RecordingSetup, _>(
        &ModelConfig::new("gpt-4o", "openai"),
        &dataset(),
        &BenchmarkConfig::default(),
        |_, _| Err(anyhow::anyhow!("Failed to create HTTP client")),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to create HTTP client");
}
