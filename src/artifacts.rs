//! Startup loading of the pretrained vectorizer and classifiers.

use crate::classifiers::{
    ClassLabel, LinearSvm, LinearSvmArtifact, LogisticRegression, LogisticRegressionArtifact,
    MultinomialNaiveBayes, NaiveBayesArtifact,
};
use crate::config::ArtifactsConfig;
use crate::error::ArtifactError;
use crate::features::{FeatureExtractor, TfidfVectorizer, VectorizerArtifact};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Process-wide read-only models, shared by every request.
#[derive(Debug, Clone)]
pub struct PretrainedArtifacts {
    pub vectorizer: Arc<TfidfVectorizer>,
    pub naive_bayes: Arc<MultinomialNaiveBayes>,
    pub logistic_regression: Arc<LogisticRegression>,
    pub svm: Arc<LinearSvm>,
}

impl PretrainedArtifacts {
    pub fn load(config: &ArtifactsConfig, spam_label: &ClassLabel) -> Result<Self, ArtifactError> {
        log::info!("Loading pretrained artifacts from {}", config.model_dir);

        let vectorizer: VectorizerArtifact = read_json(&config.vectorizer_path())?;
        let naive_bayes: NaiveBayesArtifact = read_json(&config.naive_bayes_path())?;
        let logistic_regression: LogisticRegressionArtifact =
            read_json(&config.logistic_regression_path())?;
        let svm: LinearSvmArtifact = read_json(&config.svm_path())?;

        Self::from_parts(vectorizer, naive_bayes, logistic_regression, svm, spam_label)
    }

    /// Validate and assemble artifacts that are already in memory.
    pub fn from_parts(
        vectorizer: VectorizerArtifact,
        naive_bayes: NaiveBayesArtifact,
        logistic_regression: LogisticRegressionArtifact,
        svm: LinearSvmArtifact,
        spam_label: &ClassLabel,
    ) -> Result<Self, ArtifactError> {
        let vectorizer = TfidfVectorizer::from_artifact(vectorizer)?;
        let naive_bayes = MultinomialNaiveBayes::from_artifact(naive_bayes, spam_label)?;
        let logistic_regression = LogisticRegression::from_artifact(logistic_regression, spam_label)?;
        let svm = LinearSvm::from_artifact(svm, spam_label)?;

        let width = vectorizer.dimension();
        for (model, expected) in [
            ("Naive Bayes", naive_bayes.n_features()),
            ("Logistic Regression", logistic_regression.n_features()),
            ("SVM", svm.n_features()),
        ] {
            if expected != width {
                return Err(ArtifactError::Incompatible {
                    model: model.to_string(),
                    expected,
                    actual: width,
                });
            }
        }

        log::info!(
            "Artifacts loaded: {} features shared by Naive Bayes, Logistic Regression and SVM",
            width
        );

        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            naive_bayes: Arc::new(naive_bayes),
            logistic_regression: Arc::new(logistic_regression),
            svm: Arc::new(svm),
        })
    }

    pub fn feature_count(&self) -> usize {
        self.vectorizer.dimension()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read artifact {} ({} bytes)", path.display(), content.len());
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
