//! Model artifact discovery and loading.
//!
//! The models directory is scanned once at startup. When it contains a pointer
//! file, the artifact it names is loaded. Otherwise the `.json` file or
//! directory whose name sorts last is treated as the latest artifact.

use super::engine::{CompileError, RuleBasedModel};
use super::inference::NluModel;
use crate::config::ModelConfig;
use crate::models::artifact::{ModelArtifact, ARTIFACT_MANIFEST};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Model directory {0} does not exist or is not a directory")]
    DirectoryMissing(PathBuf),

    #[error("Model directory {0} contains no artifacts")]
    EmptyDirectory(PathBuf),

    #[error("Pointer file {0} must name a single entry of the model directory")]
    InvalidPointer(PathBuf),

    #[error("Pointer file {pointer} names missing artifact '{target}'")]
    DanglingPointer { pointer: PathBuf, target: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    Compile(#[from] CompileError),
}

#[derive(Debug, Clone)]
pub struct ModelLoader {
    directory: PathBuf,
    pointer_file: String,
}

impl ModelLoader {
    pub fn new(directory: impl Into<PathBuf>, pointer_file: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            pointer_file: pointer_file.into(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(&config.directory, &config.pointer_file)
    }

    /// Pick the artifact to load without reading it.
    pub async fn resolve(&self) -> Result<PathBuf, LoadError> {
        let is_dir = tokio::fs::metadata(&self.directory)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(LoadError::DirectoryMissing(self.directory.clone()));
        }

        if let Some(target) = self.read_pointer().await? {
            return Ok(target);
        }

        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(|source| self.io_error(source))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| self.io_error(source))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|source| self.io_error(source))?
                .is_dir();
            if is_dir || is_json_file(&entry.path()) {
                names.push(entry.file_name());
            } else {
                tracing::debug!(entry = ?entry.file_name(), "Skipping non-artifact entry");
            }
        }

        names.sort();
        names
            .pop()
            .map(|latest| self.directory.join(latest))
            .ok_or_else(|| LoadError::EmptyDirectory(self.directory.clone()))
    }

    /// Resolve, read and compile the selected artifact.
    pub async fn load(&self) -> Result<RuleBasedModel, LoadError> {
        let path = self.resolve().await?;
        tracing::info!(path = %path.display(), "Loading NLU model");

        let artifact = read_artifact(&path).await?;
        let model = RuleBasedModel::from_artifact(artifact)?;

        tracing::info!(
            model = %model.name(),
            language = %model.language(),
            intents = model.intent_count(),
            path = %path.display(),
            "NLU model loaded"
        );

        Ok(model)
    }

    async fn read_pointer(&self) -> Result<Option<PathBuf>, LoadError> {
        let pointer = self.directory.join(&self.pointer_file);
        let content = match tokio::fs::read_to_string(&pointer).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LoadError::Io {
                    path: pointer,
                    source,
                })
            }
        };

        let target = content.trim();
        let mut components = Path::new(target).components();
        let single_entry = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_entry || target == self.pointer_file {
            return Err(LoadError::InvalidPointer(pointer));
        }

        let path = self.directory.join(target);
        if tokio::fs::metadata(&path).await.is_err() {
            return Err(LoadError::DanglingPointer {
                pointer,
                target: target.to_string(),
            });
        }

        tracing::debug!(
            pointer = %pointer.display(),
            artifact = target,
            "Model selected by pointer file"
        );
        Ok(Some(path))
    }

    fn io_error(&self, source: std::io::Error) -> LoadError {
        LoadError::Io {
            path: self.directory.clone(),
            source,
        }
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Read an artifact from a JSON file or from `model.json` inside a directory.
pub async fn read_artifact(path: &Path) -> Result<ModelArtifact, LoadError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let file = if metadata.is_dir() {
        path.join(ARTIFACT_MANIFEST)
    } else {
        path.to_path_buf()
    };

    let raw = tokio::fs::read(&file)
        .await
        .map_err(|source| LoadError::Io {
            path: file.clone(),
            source,
        })?;

    serde_json::from_slice(&raw).map_err(|source| LoadError::Parse { path: file, source })
}
