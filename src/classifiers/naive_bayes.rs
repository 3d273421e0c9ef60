use super::{check_dimension, check_finite, spam_index, ClassLabel};
use crate::error::{ArtifactError, ClassifyError};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

const MODEL_NAME: &str = "Naive Bayes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesArtifact {
    pub classes: Vec<ClassLabel>,
    pub class_log_prior: Vec<f64>,
    /// One row of per-feature log probabilities for each class.
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Multinomial Naive Bayes over non-negative term weights.
#[derive(Debug, Clone)]
pub struct MultinomialNaiveBayes {
    artifact: NaiveBayesArtifact,
    spam_index: usize,
    n_features: usize,
}

impl MultinomialNaiveBayes {
    pub fn from_artifact(
        artifact: NaiveBayesArtifact,
        spam_label: &ClassLabel,
    ) -> Result<Self, ArtifactError> {
        let spam_index = spam_index("naive bayes", &artifact.classes, spam_label)?;

        if artifact.class_log_prior.len() != artifact.classes.len()
            || artifact.feature_log_prob.len() != artifact.classes.len()
        {
            return Err(ArtifactError::invalid(
                "naive bayes",
                "class_log_prior and feature_log_prob must have one entry per class",
            ));
        }

        let n_features = artifact.feature_log_prob[0].len();
        if n_features == 0 || artifact.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(ArtifactError::invalid(
                "naive bayes",
                "feature_log_prob rows must be non-empty and equal length",
            ));
        }

        check_finite("naive bayes", "class_log_prior", &artifact.class_log_prior)?;
        for row in &artifact.feature_log_prob {
            check_finite("naive bayes", "feature_log_prob", row)?;
        }

        Ok(Self {
            artifact,
            spam_index,
            n_features,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[ClassLabel] {
        &self.artifact.classes
    }

    pub fn spam_index(&self) -> usize {
        self.spam_index
    }

    pub fn joint_log_likelihood(&self, x: &FeatureVector) -> Result<Vec<f64>, ClassifyError> {
        check_dimension(MODEL_NAME, self.n_features, x)?;
        Ok(self
            .artifact
            .class_log_prior
            .iter()
            .zip(&self.artifact.feature_log_prob)
            .map(|(prior, row)| prior + x.dot(row))
            .collect())
    }

    pub fn predict_proba(&self, x: &FeatureVector) -> Result<Vec<f64>, ClassifyError> {
        Ok(softmax(&self.joint_log_likelihood(x)?))
    }

    /// Index of the most likely class; the first class wins ties.
    pub fn predict_index(&self, x: &FeatureVector) -> Result<usize, ClassifyError> {
        Ok(argmax(&self.joint_log_likelihood(x)?))
    }

    /// Predicted index and class probabilities from a single likelihood pass.
    pub fn predict_index_and_proba(
        &self,
        x: &FeatureVector,
    ) -> Result<(usize, Vec<f64>), ClassifyError> {
        let jll = self.joint_log_likelihood(x)?;
        Ok((argmax(&jll), softmax(&jll)))
    }

    pub fn predict(&self, x: &FeatureVector) -> Result<&ClassLabel, ClassifyError> {
        let idx = self.predict_index(x)?;
        Ok(&self.artifact.classes[idx])
    }
}

fn softmax(jll: &[f64]) -> Vec<f64> {
    let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_norm = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
    jll.iter().map(|v| (v - log_norm).exp()).collect()
}

fn argmax(jll: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in jll.iter().enumerate().skip(1) {
        if *value > jll[best] {
            best = idx;
        }
    }
    best
}
