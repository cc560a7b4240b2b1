// ScandEval - model loading for language model benchmarks
// Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scandeval::config::{load_benchmark_config, DatasetConfig, Device, ModelConfig, Task};
use scandeval::errors::{config_parse_error, describe_load_failure};
use scandeval::models::{ModelWeights, Tokenizer};
use scandeval::{load_model, ModelType};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "scandeval")]
#[command(about = "Load models for language model benchmarking", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: ~/.scandeval/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a model and print what was loaded
    Load {
        /// Model ID (Hub repo, local path, fresh model or API model), optionally `id@revision`
        model_id: String,

        /// Loading strategy: fresh, hf, local or openai
        #[arg(long, default_value = "hf")]
        model_type: String,

        /// Task the model is loaded for
        #[arg(long, default_value = "text-classification")]
        task: Task,

        /// Comma-separated label names for classification tasks
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Dataset name
        #[arg(long, default_value = "custom")]
        dataset: String,

        /// Override the configured device
        #[arg(long)]
        device: Option<Device>,
    },
    /// List registered model types
    ModelTypes,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    match args.command {
        Command::ModelTypes => {
            for model_type in ModelType::ALL {
                println!("{:<8} {}", model_type.tag(), model_type.description());
            }
            Ok(())
        }
        Command::Load {
            model_id,
            model_type,
            task,
            labels,
            dataset,
            device,
        } => {
            let mut benchmark_config = match load_benchmark_config(args.config.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}", config_parse_error(&format!("{:#}", e)));
                    std::process::exit(1);
                }
            };
            if let Some(device) = device {
                benchmark_config.device = device;
            }

            let model_config = ModelConfig::new(model_id, model_type);
            let dataset_config = DatasetConfig::new(dataset, task).with_labels(labels);

            match load_model(&model_config, &dataset_config, &benchmark_config).await {
                Ok((tokenizer, model)) => {
                    print_summary(&tokenizer, &model);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", describe_load_failure(&model_config.model_id, &e));
                    std::process::exit(1);
                }
            }
        }
    }
}

fn print_summary(tokenizer: &Tokenizer, model: &scandeval::Model) {
    println!("Model:         {}", model.model_id);
    println!("Source:        {}", model.source.kind());
    if !model.architecture.architectures.is_empty() {
        println!("Architecture:  {}", model.architecture.architectures.join(", "));
    }
    println!("Head:          {}", model.head);
    println!("Generative:    {}", model.is_generative.unwrap_or(false));
    println!("Device:        {}", model.device);
    if model.num_labels() > 0 {
        println!("Labels:        {}", model.id2label.join(", "));
    }

    match &model.weights {
        ModelWeights::RandomInit { seed } => println!("Weights:       random init (seed {})", seed),
        ModelWeights::Safetensors(summary) => println!(
            "Weights:       {} tensors, {} parameters in {} files",
            summary.num_tensors,
            summary.num_parameters,
            summary.files.len()
        ),
        ModelWeights::Remote => println!("Weights:       remote"),
    }

    match tokenizer {
        Tokenizer::HuggingFace(_) => println!(
            "Tokenizer:     vocab {} / max length {}",
            tokenizer.vocab_size().unwrap_or(0),
            tokenizer
                .model_max_length()
                .map(|len| len.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ),
        Tokenizer::Api(api) => println!(
            "Tokenizer:     {} / context window {}",
            api.encoding, api.context_window
        ),
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Bridge log crate → tracing (hf-hub and reqwest log through it)
    tracing_log::LogTracer::init().ok();
}
