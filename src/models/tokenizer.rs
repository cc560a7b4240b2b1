// Tokenizers returned alongside a loaded model
//
// Local and hub models carry a Hugging Face `tokenizers::Tokenizer`.
// API models only carry a descriptor of the remote tokenizer: which
// encoding the endpoint uses and how long its context window is.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";

/// Tokenizer of a loaded model
#[derive(Debug, Clone)]
pub enum Tokenizer {
    HuggingFace(HfTokenizer),
    Api(ApiTokenizer),
}

impl Tokenizer {
    /// Maximum sequence length the model accepts, if known
    pub fn model_max_length(&self) -> Option<usize> {
        match self {
            Tokenizer::HuggingFace(tok) => tok.model_max_length,
            Tokenizer::Api(tok) => Some(tok.context_window),
        }
    }

    /// Vocabulary size including added tokens (unknown for API tokenizers)
    pub fn vocab_size(&self) -> Option<usize> {
        match self {
            Tokenizer::HuggingFace(tok) => Some(tok.inner.get_vocab_size(true)),
            Tokenizer::Api(_) => None,
        }
    }
}

/// A `tokenizer.json` tokenizer plus the limits from `tokenizer_config.json`
#[derive(Debug, Clone)]
pub struct HfTokenizer {
    pub inner: tokenizers::Tokenizer,
    pub model_max_length: Option<usize>,
}

#[derive(Deserialize)]
struct TokenizerConfig {
    #[serde(default)]
    model_max_length: Option<f64>,
}

// Hugging Face writes a huge float sentinel when the limit is unset
const MAX_LENGTH_SENTINEL: f64 = 1e29;

impl HfTokenizer {
    /// Load `tokenizer.json` (required) and `tokenizer_config.json` (optional)
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let tokenizer_path = dir.join(TOKENIZER_FILE);
        let inner = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer {}: {}", tokenizer_path.display(), e))?;

        let config_path = dir.join(TOKENIZER_CONFIG_FILE);
        let model_max_length = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            parse_model_max_length(&contents)?
        } else {
            None
        };

        Ok(Self {
            inner,
            model_max_length,
        })
    }
}

fn parse_model_max_length(contents: &str) -> Result<Option<usize>> {
    let config: TokenizerConfig =
        serde_json::from_str(contents).context("Failed to parse tokenizer_config.json")?;
    Ok(config
        .model_max_length
        .filter(|len| *len > 0.0 && *len < MAX_LENGTH_SENTINEL)
        .map(|len| len as usize))
}

/// Descriptor of the tokenizer behind an API model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTokenizer {
    pub model_id: String,
    /// BPE encoding name, e.g. `cl100k_base`
    pub encoding: String,
    pub context_window: usize,
}

impl ApiTokenizer {
    pub fn for_model(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            encoding: encoding_for_model(model_id).to_string(),
            context_window: context_window_for_model(model_id),
        }
    }
}

/// Encoding used by an OpenAI model family
pub fn encoding_for_model(model_id: &str) -> &'static str {
    let id = model_id.to_lowercase();
    const O200K_PREFIXES: [&str; 8] = ["gpt-4o", "chatgpt-4o", "gpt-4.1", "gpt-4.5", "gpt-5", "o1", "o3", "o4"];
    if O200K_PREFIXES.iter().any(|prefix| id.starts_with(prefix)) {
        "o200k_base"
    } else if id.starts_with("text-davinci") || id.starts_with("code-davinci") {
        "p50k_base"
    } else if id == "davinci" || id == "curie" || id == "babbage" || id == "ada" {
        "r50k_base"
    } else {
        "cl100k_base"
    }
}

/// Context window of an OpenAI model family
pub fn context_window_for_model(model_id: &str) -> usize {
    let id = model_id.to_lowercase();
    match id.as_str() {
        id if id.starts_with("gpt-5") => 400_000,
        id if id.starts_with("gpt-4.1") => 1_047_576,
        id if id.starts_with("gpt-4.5") || id.starts_with("chatgpt-4o") => 128_000,
        id if id.starts_with("gpt-4o") || id.starts_with("gpt-4-turbo") || id.starts_with("o1") => 128_000,
        id if id.starts_with("o3") || id.starts_with("o4") => 200_000,
        id if id.starts_with("gpt-4-32k") => 32_768,
        id if id.starts_with("gpt-4") => 8_192,
        id if id.starts_with("gpt-3.5-turbo-instruct") => 4_096,
        id if id.starts_with("gpt-3.5-turbo") => 16_385,
        _ => 4_096,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_max_length_sentinel_is_ignored() {
        assert_eq!(parse_model_max_length(r#"{"model_max_length": 512}"#).unwrap(), Some(512));
        assert_eq!(
            parse_model_max_length(r#"{"model_max_length": 1000000000000000019884624838656}"#).unwrap(),
            None
        );
        assert_eq!(parse_model_max_length(r#"{"do_lower_case": true}"#).unwrap(), None);
    }

    #[test]
    fn test_api_tokenizer_encodings() {
        assert_eq!(ApiTokenizer::for_model("gpt-4o-mini").encoding, "o200k_base");
        assert_eq!(ApiTokenizer::for_model("gpt-4-0613").encoding, "cl100k_base");
        assert_eq!(ApiTokenizer::for_model("text-davinci-003").encoding, "p50k_base");
        assert_eq!(ApiTokenizer::for_model("my-finetune").encoding, "cl100k_base");
        assert_eq!(ApiTokenizer::for_model("gpt-5-mini").encoding, "o200k_base");
        assert_eq!(ApiTokenizer::for_model("o4-mini").encoding, "o200k_base");
        assert_eq!(ApiTokenizer::for_model("gpt-4.5-preview").encoding, "o200k_base");
    }

    #[test]
    fn test_api_tokenizer_context_windows() {
        assert_eq!(context_window_for_model("gpt-4o"), 128_000);
        assert_eq!(context_window_for_model("gpt-5"), 400_000);
        assert_eq!(context_window_for_model("o4-mini"), 200_000);
        assert_eq!(context_window_for_model("gpt-4.5-preview"), 128_000);
        assert_eq!(context_window_for_model("gpt-4-32k-0613"), 32_768);
        assert_eq!(context_window_for_model("gpt-4"), 8_192);
        assert_eq!(context_window_for_model("gpt-3.5-turbo-instruct"), 4_096);
        assert_eq!(context_window_for_model("gpt-3.5-turbo"), 16_385);
    }
}
