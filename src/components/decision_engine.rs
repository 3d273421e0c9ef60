//! Decision Engine Component
//!
//! Runs the three model adapters over one shared feature vector, takes a
//! majority vote and reports the mean support for the winning label.

use super::model_adapters::{LogisticRegressionAdapter, NaiveBayesAdapter, SvmAdapter};
use super::SpamModel;
use crate::artifacts::PretrainedArtifacts;
use crate::config::EnsembleConfig;
use crate::error::ClassifyError;
use crate::features::FeatureExtractor;
use crate::verdict::{EnsembleVerdict, Label, PerModelVerdict};
use std::sync::Arc;

/// Spam votes needed out of three.
pub const SPAM_VOTES_REQUIRED: u8 = 2;

pub struct EnsembleClassifier {
    extractor: Arc<dyn FeatureExtractor>,
    models: [Box<dyn SpamModel>; 3],
    spam_votes_required: u8,
}

impl EnsembleClassifier {
    pub fn new(extractor: Arc<dyn FeatureExtractor>, models: [Box<dyn SpamModel>; 3]) -> Self {
        Self {
            extractor,
            models,
            spam_votes_required: SPAM_VOTES_REQUIRED,
        }
    }

    /// Clamped to 1..=3.
    pub fn with_spam_votes_required(mut self, votes: u8) -> Self {
        let clamped = votes.clamp(1, self.models.len() as u8);
        if clamped != votes {
            log::warn!(
                "spam_votes_required {} out of range, using {}",
                votes,
                clamped
            );
        }
        self.spam_votes_required = clamped;
        self
    }

    pub fn spam_votes_required(&self) -> u8 {
        self.spam_votes_required
    }

    /// Naive Bayes, Logistic Regression, SVM over the shared vectorizer.
    pub fn from_artifacts(artifacts: &PretrainedArtifacts, config: &EnsembleConfig) -> Self {
        let extractor: Arc<dyn FeatureExtractor> = artifacts.vectorizer.clone();
        let models: [Box<dyn SpamModel>; 3] = [
            Box::new(NaiveBayesAdapter::new(artifacts.naive_bayes.clone())),
            Box::new(LogisticRegressionAdapter::with_threshold(
                artifacts.logistic_regression.clone(),
                config.logistic_regression_threshold,
            )),
            Box::new(SvmAdapter::new(artifacts.svm.clone())),
        ];
        Self::new(extractor, models).with_spam_votes_required(config.spam_votes_required)
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    /// Classify one email text.
    pub fn decide(&self, text: &str) -> Result<EnsembleVerdict, ClassifyError> {
        if text.trim().is_empty() {
            log::warn!("Rejected blank input before inference");
            return Err(ClassifyError::EmptyInput);
        }

        let features = self.extractor.extract(text)?;
        log::debug!(
            "{} produced {} non-zero features of {}",
            self.extractor.name(),
            features.nnz(),
            features.dimension()
        );

        let mut per_model = Vec::with_capacity(self.models.len());
        for model in &self.models {
            let verdict = model.classify(&features)?;
            log::debug!(
                "{}: is_spam={} spam_probability={:.4}",
                model.name(),
                verdict.is_spam,
                verdict.spam_probability
            );
            per_model.push(PerModelVerdict {
                model: model.name().to_string(),
                verdict,
            });
        }

        let verdict = aggregate(per_model, self.spam_votes_required);
        log::debug!("Ensemble verdict {} - {}", verdict.summary(), verdict.reasoning());
        Ok(verdict)
    }
}

/// Majority vote plus confidence for the winning label.
pub fn aggregate(per_model: Vec<PerModelVerdict>, spam_votes_required: u8) -> EnsembleVerdict {
    let spam_votes = per_model.iter().filter(|m| m.verdict.is_spam).count() as u8;
    let final_label = Label::from_spam(spam_votes >= spam_votes_required);

    let count = per_model.len().max(1) as f64;
    let support: f64 = per_model
        .iter()
        .map(|m| match final_label {
            Label::Spam => m.verdict.spam_probability,
            Label::NotSpam => 1.0 - m.verdict.spam_probability,
        })
        .sum();

    EnsembleVerdict {
        final_label,
        confidence: (support / count).clamp(0.0, 1.0),
        spam_votes,
        per_model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use crate::verdict::ModelVerdict;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubExtractor;

    impl FeatureExtractor for StubExtractor {
        fn extract(&self, text: &str) -> Result<FeatureVector, ClassifyError> {
            Ok(FeatureVector::new(1, vec![(0, text.len() as f64)]))
        }

        fn dimension(&self) -> usize {
            1
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubModel {
        name: &'static str,
        verdict: ModelVerdict,
        calls: Arc<AtomicUsize>,
    }

    impl SpamModel for StubModel {
        fn classify(&self, _features: &FeatureVector) -> Result<ModelVerdict, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.verdict)
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct FailingModel;

    impl SpamModel for FailingModel {
        fn classify(&self, features: &FeatureVector) -> Result<ModelVerdict, ClassifyError> {
            Err(ClassifyError::inference(
                self.name(),
                format!("expected 7 features, got {}", features.dimension()),
            ))
        }

        fn name(&self) -> &str {
            "SVM"
        }
    }

    fn ensemble(outputs: [(bool, f64); 3], calls: &Arc<AtomicUsize>) -> EnsembleClassifier {
        let names = ["Naive Bayes", "Logistic Regression", "SVM"];
        let models = [0usize, 1, 2].map(|i| -> Box<dyn SpamModel> {
            Box::new(StubModel {
                name: names[i],
                verdict: ModelVerdict::new(outputs[i].0, outputs[i].1),
                calls: calls.clone(),
            })
        });
        EnsembleClassifier::new(Arc::new(StubExtractor), models)
    }

    fn decide(outputs: [(bool, f64); 3]) -> EnsembleVerdict {
        let calls = Arc::new(AtomicUsize::new(0));
        ensemble(outputs, &calls).decide("some email").unwrap()
    }

    #[test]
    fn test_all_vote_combinations() {
        for mask in 0u8..8 {
            let votes = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0];
            let verdict = decide(votes.map(|v| (v, if v { 0.8 } else { 0.2 })));
            let expected = votes.iter().filter(|v| **v).count();
            assert_eq!(verdict.spam_votes as usize, expected);
            assert_eq!(
                verdict.final_label,
                if expected >= 2 { Label::Spam } else { Label::NotSpam },
                "votes {:?}",
                votes
            );
        }
    }

    #[test]
    fn test_two_of_three_spam_scenario() {
        let verdict = decide([(true, 0.90), (false, 0.40), (true, 0.70)]);
        assert_eq!(verdict.final_label, Label::Spam);
        assert_eq!(verdict.spam_votes, 2);
        assert!((verdict.confidence - (0.90 + 0.40 + 0.70) / 3.0).abs() < 1e-12);
        assert_eq!(verdict.confidence_percent(), 66.67);
    }

    #[test]
    fn test_unanimous_not_spam_scenario() {
        let verdict = decide([(false, 0.10), (false, 0.05), (false, 0.20)]);
        assert_eq!(verdict.final_label, Label::NotSpam);
        assert_eq!(verdict.spam_votes, 0);
        assert!((verdict.confidence - (0.90 + 0.95 + 0.80) / 3.0).abs() < 1e-12);
        assert_eq!(verdict.confidence_percent(), 88.33);
    }

    #[test]
    fn test_confidence_describes_winning_label() {
        // Spam wins with low spam probabilities: confidence is still the spam mean
        let verdict = decide([(true, 0.30), (true, 0.20), (false, 0.10)]);
        assert_eq!(verdict.final_label, Label::Spam);
        assert!((verdict.confidence - 0.2).abs() < 1e-12);

        // Not spam wins with high spam probabilities: confidence uses 1 - p
        let verdict = decide([(false, 0.90), (true, 0.60), (false, 0.75)]);
        assert_eq!(verdict.final_label, Label::NotSpam);
        assert!((verdict.confidence - (0.10 + 0.40 + 0.25) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_per_model_order_is_preserved() {
        let verdict = decide([(true, 0.9), (false, 0.4), (true, 0.7)]);
        let names: Vec<&str> = verdict.per_model.iter().map(|m| m.model.as_str()).collect();
        assert_eq!(names, vec!["Naive Bayes", "Logistic Regression", "SVM"]);
        assert_eq!(verdict.per_model[1].verdict, ModelVerdict::new(false, 0.4));
    }

    #[test]
    fn test_blank_input_never_reaches_models() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = ensemble([(true, 0.9); 3], &calls);
        for text in ["", "   ", "\n\t  \r\n"] {
            assert!(matches!(
                classifier.decide(text),
                Err(ClassifyError::EmptyInput)
            ));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        classifier.decide("hello").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_model_failure_aborts_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let models: [Box<dyn SpamModel>; 3] = [
            Box::new(StubModel {
                name: "Naive Bayes",
                verdict: ModelVerdict::new(true, 0.9),
                calls: calls.clone(),
            }),
            Box::new(StubModel {
                name: "Logistic Regression",
                verdict: ModelVerdict::new(true, 0.9),
                calls: calls.clone(),
            }),
            Box::new(FailingModel),
        ];
        let classifier = EnsembleClassifier::new(Arc::new(StubExtractor), models);
        let err = classifier.decide("win a prize").unwrap_err();
        assert!(matches!(err, ClassifyError::ModelInference { ref model, .. } if model == "SVM"));
    }

    #[test]
    fn test_decide_is_deterministic() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = ensemble([(true, 0.61), (false, 0.33), (true, 0.52)], &calls);
        let first = classifier.decide("Limited offer").unwrap();
        let second = classifier.decide("Limited offer").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    }

    #[test]
    fn test_configurable_vote_cutoff() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = ensemble([(true, 0.9), (false, 0.2), (false, 0.1)], &calls)
            .with_spam_votes_required(1);
        assert_eq!(classifier.decide("x").unwrap().final_label, Label::Spam);
    }

    #[test]
    fn test_vote_cutoff_is_clamped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier =
            ensemble([(false, 0.1); 3], &calls).with_spam_votes_required(0);
        assert_eq!(classifier.spam_votes_required(), 1);
        assert_eq!(classifier.decide("x").unwrap().final_label, Label::NotSpam);

        let classifier = ensemble([(true, 0.9); 3], &calls).with_spam_votes_required(4);
        assert_eq!(classifier.spam_votes_required(), 3);
        assert_eq!(classifier.decide("x").unwrap().final_label, Label::Spam);
    }

    #[test]
    fn test_confidence_stays_in_unit_interval() {
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let verdict = decide([(p >= 0.5, p), (p > 0.5, p), (false, 1.0 - p)]);
            assert!((0.0..=1.0).contains(&verdict.confidence));
        }
    }
}
