//! Model Adapters
//!
//! One adapter per classifier kind. Naive Bayes and logistic regression
//! expose class probabilities directly; the SVM only exposes a margin, which
//! is squashed through a sigmoid to approximate a spam probability.

use super::SpamModel;
use crate::classifiers::{sigmoid, LinearSvm, LogisticRegression, MultinomialNaiveBayes};
use crate::error::ClassifyError;
use crate::features::FeatureVector;
use crate::verdict::ModelVerdict;
use std::sync::Arc;

/// Tuned spam cutoff for the logistic regression model.
pub const LOGISTIC_REGRESSION_THRESHOLD: f64 = 0.56;

pub struct NaiveBayesAdapter {
    model: Arc<MultinomialNaiveBayes>,
}

impl NaiveBayesAdapter {
    pub fn new(model: Arc<MultinomialNaiveBayes>) -> Self {
        Self { model }
    }
}

impl SpamModel for NaiveBayesAdapter {
    fn classify(&self, features: &FeatureVector) -> Result<ModelVerdict, ClassifyError> {
        let spam_index = self.model.spam_index();
        let (predicted, proba) = self.model.predict_index_and_proba(features)?;
        Ok(ModelVerdict::new(predicted == spam_index, proba[spam_index]))
    }

    fn name(&self) -> &str {
        "Naive Bayes"
    }
}

/// Reads the spam probability directly but replaces the model's 0.5
/// boundary with its own threshold.
pub struct LogisticRegressionAdapter {
    model: Arc<LogisticRegression>,
    threshold: f64,
}

impl LogisticRegressionAdapter {
    pub fn new(model: Arc<LogisticRegression>) -> Self {
        Self::with_threshold(model, LOGISTIC_REGRESSION_THRESHOLD)
    }

    pub fn with_threshold(model: Arc<LogisticRegression>, threshold: f64) -> Self {
        Self { model, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_spam_probability(&self, spam_probability: f64) -> bool {
        spam_probability >= self.threshold
    }
}

impl SpamModel for LogisticRegressionAdapter {
    fn classify(&self, features: &FeatureVector) -> Result<ModelVerdict, ClassifyError> {
        let proba = self.model.predict_proba(features)?;
        let spam_probability = proba[self.model.spam_index()];
        Ok(ModelVerdict::new(
            self.is_spam_probability(spam_probability),
            spam_probability,
        ))
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}

pub struct SvmAdapter {
    model: Arc<LinearSvm>,
}

impl SvmAdapter {
    pub fn new(model: Arc<LinearSvm>) -> Self {
        Self { model }
    }
}

impl SpamModel for SvmAdapter {
    fn classify(&self, features: &FeatureVector) -> Result<ModelVerdict, ClassifyError> {
        let spam_index = self.model.spam_index();
        let score = self.model.decision_function(features)?;
        // Margins point toward classes[1]
        let spam_score = if spam_index == 1 { score } else { -score };
        let predicted = self.model.predict_index(features)?;
        Ok(ModelVerdict::new(predicted == spam_index, sigmoid(spam_score)))
    }

    fn name(&self) -> &str {
        "SVM"
    }
}
