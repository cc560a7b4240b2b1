// Configuration module
// Model, dataset and benchmark configuration plus the file/env loader

mod backend;
mod loader;
mod settings;
mod task;

pub use backend::Device;
pub use loader::{apply_env_overrides, default_config_path, load_benchmark_config, parse_benchmark_config};
pub use settings::{BenchmarkConfig, DatasetConfig, ModelConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_REVISION};
pub use task::Task;
