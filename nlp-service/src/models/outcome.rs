use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    pub name: String,
    pub confidence: f64,
}

/// A labelled span of the input text.
///
/// `start` and `end` are character offsets, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity: String,
    pub value: String,
    pub start: usize,
    pub end: usize,
    pub extractor: String,
}

/// Full result of running an utterance through a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub text: String,
    pub intent: Option<IntentPrediction>,
    pub entities: Vec<Entity>,
    /// Every scored intent, best first.
    pub intent_ranking: Vec<IntentPrediction>,
}

impl ParseOutcome {
    pub fn empty(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: None,
            entities: Vec::new(),
            intent_ranking: Vec::new(),
        }
    }
}
