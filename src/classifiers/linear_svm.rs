use super::{check_dimension, check_finite, spam_index, ClassLabel};
use crate::error::{ArtifactError, ClassifyError};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

const MODEL_NAME: &str = "SVM";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvmArtifact {
    pub classes: Vec<ClassLabel>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Linear support vector machine. Positive margins select `classes[1]`.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    artifact: LinearSvmArtifact,
    spam_index: usize,
}

impl LinearSvm {
    pub fn from_artifact(
        artifact: LinearSvmArtifact,
        spam_label: &ClassLabel,
    ) -> Result<Self, ArtifactError> {
        let spam_index = spam_index("svm", &artifact.classes, spam_label)?;
        if artifact.coef.is_empty() {
            return Err(ArtifactError::invalid("svm", "empty coef"));
        }
        check_finite("svm", "coef", &artifact.coef)?;
        check_finite("svm", "intercept", &[artifact.intercept])?;
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

    /// Signed distance from the separating hyperplane.
    pub fn decision_function(&self, x: &FeatureVector) -> Result<f64, ClassifyError> {
        check_dimension(MODEL_NAME, self.n_features(), x)?;
        Ok(x.dot(&self.artifact.coef) + self.artifact.intercept)
    }

    pub fn predict_index(&self, x: &FeatureVector) -> Result<usize, ClassifyError> {
        Ok(if self.decision_function(x)? > 0.0 { 1 } else { 0 })
    }

    pub fn predict(&self, x: &FeatureVector) -> Result<&ClassLabel, ClassifyError> {
        let idx = self.predict_index(x)?;
        Ok(&self.artifact.classes[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearSvm {
        let artifact = LinearSvmArtifact {
            classes: vec![ClassLabel::Text("ham".into()), ClassLabel::Text("spam".into())],
            coef: vec![1.5, -2.0, 0.0],
            intercept: 0.25,
        };
        LinearSvm::from_artifact(artifact, &ClassLabel::Text("spam".into())).unwrap()
    }

    #[test]
    fn test_sign_of_margin_selects_class() {
        let svm = model();
        let positive = FeatureVector::from_dense(&[1.0, 0.0, 0.0]);
        assert!((svm.decision_function(&positive).unwrap() - 1.75).abs() < 1e-12);
        assert_eq!(svm.predict(&positive).unwrap(), &ClassLabel::Text("spam".into()));

        let negative = FeatureVector::from_dense(&[0.0, 1.0, 0.0]);
        assert_eq!(svm.predict(&negative).unwrap(), &ClassLabel::Text("ham".into()));
    }

    #[test]
    fn test_zero_margin_is_negative_class() {
        let artifact = LinearSvmArtifact {
            classes: vec![ClassLabel::Int(0), ClassLabel::Int(1)],
            coef: vec![1.0],
            intercept: 0.0,
        };
        let svm = LinearSvm::from_artifact(artifact, &ClassLabel::Int(1)).unwrap();
        assert_eq!(svm.predict_index(&FeatureVector::new(1, Vec::new())).unwrap(), 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let svm = model();
        let err = svm
            .decision_function(&FeatureVector::from_dense(&[1.0]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model inference failed in SVM: expected 3 features, got 1"
        );
    }
}
