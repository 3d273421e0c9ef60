//! Ensemble components
//!
//! Model adapters normalize each classifier's native output into a
//! `ModelVerdict`; the decision engine votes over them.

pub mod decision_engine;
pub mod model_adapters;

pub use decision_engine::{aggregate, EnsembleClassifier};
pub use model_adapters::{LogisticRegressionAdapter, NaiveBayesAdapter, SvmAdapter};

use crate::error::ClassifyError;
use crate::features::FeatureVector;
use crate::verdict::ModelVerdict;

/// Uniform prediction interface over the ensemble's classifiers.
pub trait SpamModel: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<ModelVerdict, ClassifyError>;
    fn name(&self) -> &str;
}
