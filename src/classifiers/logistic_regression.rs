use super::{check_dimension, check_finite, sigmoid, spam_index, ClassLabel};
use crate::error::{ArtifactError, ClassifyError};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

const MODEL_NAME: &str = "Logistic Regression";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    pub classes: Vec<ClassLabel>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Binary logistic regression; the linear score points toward `classes[1]`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    artifact: LogisticRegressionArtifact,
    spam_index: usize,
}

impl LogisticRegression {
    pub fn from_artifact(
        artifact: LogisticRegressionArtifact,
        spam_label: &ClassLabel,
    ) -> Result<Self, ArtifactError> {
        let spam_index = spam_index("logistic regression", &artifact.classes, spam_label)?;
        if artifact.coef.is_empty() {
            return Err(ArtifactError::invalid("logistic regression", "empty coef"));
        }
        check_finite("logistic regression", "coef", &artifact.coef)?;
        check_finite("logistic regression", "intercept", &[artifact.intercept])?;
        Ok(Self {
            artifact,
            spam_index,
        })
    }

    pub fn n_features(&self) -> usize {
        self.artifact.coef.len()
    }

    pub fn classes(&self) -> &[ClassLabel] {
        &self.artifact.classes
    }

    pub fn spam_index(&self) -> usize {
        self.spam_index
    }

    pub fn decision_function(&self, x: &FeatureVector) -> Result<f64, ClassifyError> {
        check_dimension(MODEL_NAME, self.n_features(), x)?;
        Ok(x.dot(&self.artifact.coef) + self.artifact.intercept)
    }

    pub fn predict_proba(&self, x: &FeatureVector) -> Result<[f64; 2], ClassifyError> {
        let positive = sigmoid(self.decision_function(x)?);
        Ok([1.0 - positive, positive])
    }
}
