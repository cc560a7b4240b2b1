// Loaded model and tokenizer types
// Everything a model setup returns, plus the generative classification helper

pub mod architecture;
pub mod classification;
pub mod model;
pub mod tokenizer;
pub mod weights;

pub use architecture::{is_generative_architecture, ArchitectureConfig, TaskHead};
pub use classification::model_is_generative;
pub use model::{Model, ModelSource};
pub use tokenizer::{ApiTokenizer, HfTokenizer, Tokenizer};
pub use weights::{ModelWeights, WeightsSummary};
