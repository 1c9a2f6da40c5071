pub mod artifact;
pub mod outcome;

pub use artifact::{EntityDefinition, EntityValue, IntentDefinition, ModelArtifact};
pub use outcome::{Entity, IntentPrediction, ParseOutcome};
