//! Model implementations for testing.

use super::inference::{ModelError, NluModel};
use crate::models::{Entity, IntentPrediction, ParseOutcome};

/// Returns the same intent and entities for every utterance.
pub struct StaticModel {
    intent: Option<IntentPrediction>,
    entities: Vec<Entity>,
}

impl StaticModel {
    pub fn new(intent: Option<IntentPrediction>, entities: Vec<Entity>) -> Self {
        Self { intent, entities }
    }

    pub fn with_intent(name: &str, confidence: f64) -> Self {
        Self::new(
            Some(IntentPrediction {
                name: name.to_string(),
                confidence,
            }),
            Vec::new(),
        )
    }

    pub fn without_intent() -> Self {
        Self::new(None, Vec::new())
    }
}

impl NluModel for StaticModel {
    fn name(&self) -> &str {
        "static"
    }

    fn parse(&self, text: &str) -> Result<ParseOutcome, ModelError> {
        Ok(ParseOutcome {
            text: text.to_string(),
            intent: self.intent.clone(),
            entities: self.entities.clone(),
            intent_ranking: self.intent.iter().cloned().collect(),
        })
    }
}

/// Fails every parse with a fixed message.
pub struct FailingModel {
    message: String,
}

impl FailingModel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl NluModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    fn parse(&self, _text: &str) -> Result<ParseOutcome, ModelError> {
        Err(ModelError::InferenceFailed(self.message.clone()))
    }
}

/// Panics on every parse.
pub struct PanickingModel;

impl NluModel for PanickingModel {
    fn name(&self) -> &str {
        "panicking"
    }

    fn parse(&self, _text: &str) -> Result<ParseOutcome, ModelError> {
        panic!("model state corrupted")
    }
}
