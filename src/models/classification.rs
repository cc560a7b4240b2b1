// Generative vs. predictive model classification

use super::architecture::{is_generative_architecture, TaskHead};
use super::model::{Model, ModelSource};

/// Whether a loaded model generates open-ended output
///
/// API models and models keeping their language modelling head generate;
/// models with a classification or QA head produce fixed-size predictions.
pub fn model_is_generative(model: &Model) -> bool {
    if matches!(model.source, ModelSource::Api { .. }) {
        return true;
    }

    match model.head {
        TaskHead::Generation => {
            model.architecture.is_encoder_decoder
                || model.architecture.architectures.is_empty()
                || model
                    .architecture
                    .architectures
                    .iter()
                    .any(|arch| is_generative_architecture(arch))
        }
        _ => false,
    }
}
