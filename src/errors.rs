// Model loading errors
//
// Typed errors for the failures callers need to tell apart, plus helpers
// that turn them into actionable messages for the CLI.

use thiserror::Error;

use crate::model_setups::ModelType;

/// Failures raised by the loader registry and the built-in model setups.
///
/// Everything else (I/O, parsing, network) travels as a plain
/// `anyhow::Error` with context attached by the setup that hit it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelLoadingError {
    #[error("Unknown model type '{model_type}' (expected one of: {expected})", expected = ModelType::tags().join(", "))]
    UnknownModelType { model_type: String },

    #[error("Invalid model '{model_id}': {reason}")]
    InvalidModel { model_id: String, reason: String },

    #[error("Model '{model_id}' not found: {reason}")]
    ModelNotFound { model_id: String, reason: String },

    #[error("{provider} authentication failed: {reason}")]
    Authentication { provider: String, reason: String },

    #[error("Model '{model_id}' cannot be used for {task}: the task requires a generative model")]
    UnsupportedTask { model_id: String, task: String },
}

impl ModelLoadingError {
    pub fn unknown_model_type(model_type: impl Into<String>) -> Self {
        Self::UnknownModelType {
            model_type: model_type.into(),
        }
    }

    pub fn invalid_model(model_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            model_id: model_id.into(),
            reason: reason.into(),
        }
    }

    pub fn model_not_found(model_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_id: model_id.into(),
            reason: reason.into(),
        }
    }

    pub fn authentication(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

/// Format a model loading failure with suggestions matched to its cause
pub fn describe_load_failure(model_id: &str, error: &anyhow::Error) -> String {
    match error.downcast_ref::<ModelLoadingError>() {
        Some(ModelLoadingError::UnknownModelType { model_type }) => unknown_model_type_error(model_type),
        Some(ModelLoadingError::Authentication { provider, .. }) => api_key_invalid_error(provider),
        Some(ModelLoadingError::ModelNotFound { .. }) => model_not_found_error(model_id),
        Some(ModelLoadingError::UnsupportedTask { task, .. }) => unsupported_task_error(model_id, task),
        Some(ModelLoadingError::InvalidModel { reason, .. }) => invalid_model_error(model_id, reason),
        _ => model_loading_error(model_id, &format!("{:#}", error)),
    }
}

/// Format an unknown model type error with the accepted tags
pub fn unknown_model_type_error(model_type: &str) -> String {
    let types: String = ModelType::ALL
        .iter()
        .map(|ty| format!("• {:<7} - {}\n", ty.tag(), ty.description()))
        .collect();

    format!(
        "Unknown model type '{}'\n\n\
        \x1b[1;32mTry one of:\x1b[0m\n\
        {}\n\
        List them with:\n\
           \x1b[36mscandeval model-types\x1b[0m",
        model_type, types
    )
}

/// Format a task mismatch error with helpful suggestions
pub fn unsupported_task_error(model_id: &str, task: &str) -> String {
    format!(
        "Model '{}' cannot be used for {}\n\n\
        \x1b[1;33mCause:\x1b[0m\n\
        • {} needs a generative model and '{}' is encoder-only\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Pick a generative model (e.g. a *ForCausalLM checkpoint)\n\n\
        2. Or benchmark this model on a classification task:\n\
           \x1b[36mscandeval load {} --task text-classification\x1b[0m",
        model_id, task, task, model_id, model_id
    )
}

/// Format an invalid model error with helpful suggestions
pub fn invalid_model_error(model_id: &str, reason: &str) -> String {
    format!(
        "Model '{}' is not usable\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check the model ID against the chosen --model-type\n\n\
        2. Make sure the model directory has config.json and tokenizer.json",
        model_id, reason
    )
}

/// Format a model not found error with helpful suggestions
pub fn model_not_found_error(model_id: &str) -> String {
    format!(
        "Model '{}' not found\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • Typo in the model ID or revision\n\
        • Private or gated repository without a token\n\
        • Local path does not exist\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check the model page:\n\
           \x1b[36mhttps://huggingface.co/{}\x1b[0m\n\n\
        2. Set a Hugging Face token for gated models:\n\
           \x1b[36mexport HUGGINGFACE_API_KEY=\"hf_...\"\x1b[0m\n\n\
        3. Check the model cache:\n\
           \x1b[36mls ~/.cache/scandeval/model_cache\x1b[0m",
        model_id, model_id
    )
}

/// Format an API key error with helpful suggestions
pub fn api_key_invalid_error(provider: &str) -> String {
    format!(
        "{} API key is invalid or missing\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • API key not set in config or environment\n\
        • API key has been revoked\n\
        • Wrong base URL for this key\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Set the key in the environment:\n\
           \x1b[36mexport OPENAI_API_KEY=\"sk-...\"\x1b[0m\n\n\
        2. Or add it to your config file:\n\
           \x1b[36mopenai_api_key = \"sk-...\"\x1b[0m in ~/.scandeval/config.toml\n\n\
        3. Get a new API key:\n\
           • OpenAI: https://platform.openai.com/api-keys",
        provider
    )
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(error: &str) -> String {
    format!(
        "Failed to parse config file\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat ~/.scandeval/config.toml\x1b[0m\n\n\
        2. Common mistakes:\n\
           • Missing quotes around strings\n\
           • Unknown device name (use cpu, cuda, mps or auto)",
        error
    )
}

/// Format a model loading error with helpful suggestions
pub fn model_loading_error(model_id: &str, error: &str) -> String {
    format!(
        "Failed to load model '{}'\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • Corrupted or incomplete model files\n\
        • Model has no safetensors weights\n\
        • Network failure during download\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        Clear the cached copy and download again:\n\
           \x1b[36mrm -rf ~/.cache/scandeval/model_cache/models--{}\x1b[0m",
        model_id,
        error,
        model_id.replace('/', "--")
    )
}
