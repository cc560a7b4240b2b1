// Benchmark tasks and the model head each one needs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::TaskHead;

/// Evaluation task of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    TextClassification,
    LinguisticAcceptability,
    NamedEntityRecognition,
    QuestionAnswering,
    Summarization,
    Knowledge,
    CommonSenseReasoning,
}

impl Task {
    pub const ALL: [Task; 7] = [
        Task::TextClassification,
        Task::LinguisticAcceptability,
        Task::NamedEntityRecognition,
        Task::QuestionAnswering,
        Task::Summarization,
        Task::Knowledge,
        Task::CommonSenseReasoning,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Task::TextClassification => "text-classification",
            Task::LinguisticAcceptability => "linguistic-acceptability",
            Task::NamedEntityRecognition => "named-entity-recognition",
            Task::QuestionAnswering => "question-answering",
            Task::Summarization => "summarization",
            Task::Knowledge => "knowledge",
            Task::CommonSenseReasoning => "common-sense-reasoning",
        }
    }

    /// Head an encoder model needs for this task.
    ///
    /// `None` means only a generative model can be evaluated on it.
    pub fn encoder_head(&self) -> Option<TaskHead> {
        match self {
            Task::TextClassification
            | Task::LinguisticAcceptability
            | Task::Knowledge
            | Task::CommonSenseReasoning => Some(TaskHead::SequenceClassification),
            Task::NamedEntityRecognition => Some(TaskHead::TokenClassification),
            Task::QuestionAnswering => Some(TaskHead::QuestionAnswering),
            Task::Summarization => None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");
        Task::ALL
            .into_iter()
            .find(|task| task.name() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown task: {}", s))
    }
}
