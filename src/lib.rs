pub mod artifacts;
pub mod classifiers;
pub mod components;
pub mod config;
pub mod error;
pub mod features;
pub mod history;
pub mod verdict;

pub use artifacts::PretrainedArtifacts;
pub use components::{EnsembleClassifier, SpamModel};
pub use config::Config;
pub use error::{ArtifactError, ClassifyError};
pub use features::{FeatureExtractor, FeatureVector};
pub use history::{InteractionLog, InteractionRecord, Session};
pub use verdict::{EnsembleVerdict, Label, ModelVerdict, PerModelVerdict};
