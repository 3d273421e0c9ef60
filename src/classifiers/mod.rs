//! Frozen binary classifiers evaluated from exported parameters.

pub mod linear_svm;
pub mod logistic_regression;
pub mod naive_bayes;

pub use linear_svm::{LinearSvm, LinearSvmArtifact};
pub use logistic_regression::{LogisticRegression, LogisticRegressionArtifact};
pub use naive_bayes::{MultinomialNaiveBayes, NaiveBayesArtifact};

use crate::error::{ArtifactError, ClassifyError};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class label as exported by the training side (integer or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Int(i64),
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Int(value) => write!(f, "{}", value),
            ClassLabel::Text(value) => write!(f, "{}", value),
        }
    }
}

impl Default for ClassLabel {
    fn default() -> Self {
        ClassLabel::Int(1)
    }
}

/// Logistic squashing of an unbounded score into `[0, 1]`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Position of the spam class among a binary classifier's classes.
pub(crate) fn spam_index(
    artifact: &str,
    classes: &[ClassLabel],
    spam_label: &ClassLabel,
) -> Result<usize, ArtifactError> {
    if classes.len() != 2 {
        return Err(ArtifactError::invalid(
            artifact,
            format!("expected 2 classes, found {}", classes.len()),
        ));
    }
    classes
        .iter()
        .position(|c| c == spam_label)
        .ok_or_else(|| {
            ArtifactError::invalid(
                artifact,
                format!("spam label {} not among classes {:?}", spam_label, classes),
            )
        })
}

pub(crate) fn check_finite(artifact: &str, field: &str, values: &[f64]) -> Result<(), ArtifactError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::invalid(
            artifact,
            format!("{} contains non-finite values", field),
        ));
    }
    Ok(())
}

pub(crate) fn check_dimension(
    model: &str,
    expected: usize,
    vector: &FeatureVector,
) -> Result<(), ClassifyError> {
    if vector.dimension() != expected {
        return Err(ClassifyError::inference(
            model,
            format!(
                "expected {} features, got {}",
                expected,
                vector.dimension()
            ),
        ));
    }
    Ok(())
}
