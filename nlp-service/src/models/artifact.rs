//! On-disk model artifact schema.
//!
//! An artifact is a JSON document, stored either as a `.json` file directly in
//! the models directory or as `model.json` inside an artifact directory.

use serde::{Deserialize, Serialize};

/// File name looked up inside a directory artifact.
pub const ARTIFACT_MANIFEST: &str = "model.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum confidence for the top intent. Weaker predictions are reported
    /// as "no intent".
    #[serde(default)]
    pub threshold: f64,

    pub intents: Vec<IntentDefinition>,

    #[serde(default)]
    pub entities: Vec<EntityDefinition>,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
    pub name: String,

    /// Regular expressions matched against the whole trimmed utterance.
    /// Named capture groups become entities labelled with the group name.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Words or phrases whose presence votes for this intent.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Gazetteer entry: an entity label and the values it recognises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    pub values: Vec<EntityValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityValue {
    /// Canonical value reported for every synonym match.
    pub value: String,

    #[serde(default)]
    pub synonyms: Vec<String>,
}
