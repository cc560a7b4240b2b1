// Hub Downloader - Model download with progress tracking
// Uses HuggingFace Hub for download management and caching

use anyhow::{Context, Result};
use hf_hub::api::tokio::{Api, ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::config::{BenchmarkConfig, ModelConfig};
use crate::errors::ModelLoadingError;
use crate::models::tokenizer::{TOKENIZER_CONFIG_FILE, TOKENIZER_FILE};
use crate::models::weights::{shard_files_from_index, SINGLE_WEIGHTS_FILE, WEIGHTS_INDEX_FILE};

use super::common::CONFIG_FILE;

/// Model downloader backed by the HuggingFace Hub cache
pub struct HubDownloader {
    api: Api,
    cache_dir: PathBuf,
    show_progress: bool,
}

impl HubDownloader {
    /// Create a downloader caching into `cache_dir`
    ///
    /// `HF_HOME` and `HF_ENDPOINT` are honoured. Without a configured token
    /// the one saved by `huggingface-cli login` is sent.
    pub fn new(
        cache_dir: PathBuf,
        token: Option<String>,
        endpoint: Option<String>,
        show_progress: bool,
    ) -> Result<Self> {
        Self::with_builder(ApiBuilder::from_env(), cache_dir, token, endpoint, show_progress)
    }

    /// Downloader for `model_config` under the benchmark settings
    pub fn for_model(benchmark_config: &BenchmarkConfig, model_config: &ModelConfig) -> Result<Self> {
        Self::new(
            benchmark_config.model_cache_dir(model_config),
            benchmark_config.hf_token.clone(),
            benchmark_config.hf_endpoint.clone(),
            benchmark_config.progress_bar,
        )
    }

    fn with_builder(
        builder: ApiBuilder,
        cache_dir: PathBuf,
        token: Option<String>,
        endpoint: Option<String>,
        show_progress: bool,
    ) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;

        let mut builder = builder.with_cache_dir(cache_dir.clone()).with_progress(false);
        if let Some(token) = token {
            builder = builder.with_token(Some(token));
        }
        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint.trim_end_matches('/').to_string());
        }
        let api = builder.build().context("Failed to create HuggingFace Hub client")?;

        Ok(Self {
            api,
            cache_dir,
            show_progress,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Download a model snapshot and return its directory
    ///
    /// Always fetches `config.json` and `tokenizer.json` (required) and
    /// `tokenizer_config.json` (optional). With `include_weights`, also
    /// fetches `model.safetensors` or every shard listed in the index.
    pub async fn download_model(&self, repo_id: &str, revision: &str, include_weights: bool) -> Result<PathBuf> {
        let repo = self.api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        tracing::info!("Fetching {}@{} from the Hub...", repo_id, revision);

        let progress = self.progress_bar(repo_id);

        let config_files = [
            (CONFIG_FILE, true),
            (TOKENIZER_FILE, true),
            (TOKENIZER_CONFIG_FILE, false),
        ];
        progress.inc_length(config_files.len() as u64);

        let mut snapshot_dir = None;
        let mut required_failed = Vec::new();

        for (file, required) in config_files {
            match repo.get(file).await {
                Ok(path) => {
                    tracing::debug!("Fetched {} to {:?}", file, path);
                    if snapshot_dir.is_none() {
                        snapshot_dir = path.parent().map(Path::to_path_buf);
                    }
                }
                Err(e) if required => {
                    tracing::error!("Failed to download required file {}: {}", file, e);
                    required_failed.push(file);
                }
                Err(e) => tracing::warn!("Failed to download optional file {}: {}", file, e),
            }
            progress.inc(1);
        }

        if !required_failed.is_empty() {
            progress.abandon();
            return Err(ModelLoadingError::model_not_found(
                repo_id,
                format!(
                    "could not download {} at revision '{}' (gated models need HUGGINGFACE_API_KEY)",
                    required_failed.join(", "),
                    revision
                ),
            )
            .into());
        }

        if include_weights {
            self.download_weights(&repo, repo_id, &progress).await?;
        }

        progress.finish_and_clear();

        let snapshot_dir = snapshot_dir.context("Failed to determine snapshot directory")?;
        tracing::info!("✓ {} ready at {}", repo_id, snapshot_dir.display());
        Ok(snapshot_dir)
    }

    /// Fetch the single weights file, or all shards when the repo is sharded
    async fn download_weights(&self, repo: &ApiRepo, repo_id: &str, progress: &ProgressBar) -> Result<()> {
        let shards = match repo.get(WEIGHTS_INDEX_FILE).await {
            Ok(index_path) => {
                let contents = tokio::fs::read_to_string(&index_path)
                    .await
                    .with_context(|| format!("Failed to read {}", index_path.display()))?;
                shard_files_from_index(&contents)?
            }
            Err(_) => {
                tracing::debug!("No shard index, expecting a single {}", SINGLE_WEIGHTS_FILE);
                vec![SINGLE_WEIGHTS_FILE.to_string()]
            }
        };

        progress.inc_length(shards.len() as u64);

        for (idx, shard) in shards.iter().enumerate() {
            progress.set_message(shard.clone());
            repo.get(shard).await.with_context(|| {
                format!("Failed to download weights {} of {} (only safetensors weights are supported)", shard, repo_id)
            })?;
            tracing::info!("Downloaded weights {}/{}: {}", idx + 1, shards.len(), shard);
            progress.inc(1);
        }

        Ok(())
    }

    fn progress_bar(&self, repo_id: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len} files {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(repo_id.to_string());
        bar
    }
}
