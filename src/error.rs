use std::path::PathBuf;

/// Per-request classification failures.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Please enter valid email content!")]
    EmptyInput,
    #[error("Feature extraction failed: {0}")]
    FeatureExtraction(String),
    #[error("Model inference failed in {model}: {reason}")]
    ModelInference { model: String, reason: String },
}

impl ClassifyError {
    pub fn inference(model: &str, reason: impl Into<String>) -> Self {
        ClassifyError::ModelInference {
            model: model.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether rephrasing the input can fix the failure.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, ClassifyError::EmptyInput)
    }
}

/// Startup failures while loading the pretrained artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid {artifact} artifact: {reason}")]
    Invalid { artifact: String, reason: String },
    #[error("{model} expects {expected} features but the vectorizer produces {actual}")]
    Incompatible {
        model: String,
        expected: usize,
        actual: usize,
    },
}

impl ArtifactError {
    pub fn invalid(artifact: &str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            artifact: artifact.to_string(),
            reason: reason.into(),
        }
    }
}
