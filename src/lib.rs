// ScandEval - model loading for language model benchmarks
// Library exports

pub mod config;
pub mod errors;
pub mod model_loading; // Model type dispatch
pub mod model_setups; // Fresh, hub, local and API loading strategies
pub mod models; // Loaded model and tokenizer types

pub use errors::ModelLoadingError;
pub use model_loading::{load_model, load_model_with};
pub use model_setups::{ModelSetup, ModelSetupKind, ModelType};
pub use models::{model_is_generative, Model, Tokenizer};
