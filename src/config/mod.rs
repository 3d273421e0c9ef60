use crate::classifiers::ClassLabel;
use crate::components::decision_engine::SPAM_VOTES_REQUIRED;
use crate::components::model_adapters::LOGISTIC_REGRESSION_THRESHOLD;
use crate::history::DEFAULT_PREVIEW_CHARS;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "spam-ensemble.yaml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub ensemble: EnsembleConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub logging: Option<LoggingConfig>,
}

/// Locations of the four pretrained artifacts.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub model_dir: String,
    pub vectorizer: String,
    pub naive_bayes: String,
    pub logistic_regression: String,
    pub svm: String,
}

/// Tuned decision parameters.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Spam cutoff applied to the logistic regression probability.
    pub logistic_regression_threshold: f64,
    /// Spam votes needed out of three.
    pub spam_votes_required: u8,
    /// Class label the classifiers use for spam.
    pub spam_label: ClassLabel,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub history_preview_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_dir: "models".to_string(),
            vectorizer: "vectorizer.json".to_string(),
            naive_bayes: "naive_bayes_model.json".to_string(),
            logistic_regression: "logistic_regression_model.json".to_string(),
            svm: "svm.json".to_string(),
        }
    }
}

impl ArtifactsConfig {
    pub fn resolve(&self, file: &str) -> PathBuf {
        Path::new(&self.model_dir).join(file)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.resolve(&self.vectorizer)
    }

    pub fn naive_bayes_path(&self) -> PathBuf {
        self.resolve(&self.naive_bayes)
    }

    pub fn logistic_regression_path(&self) -> PathBuf {
        self.resolve(&self.logistic_regression)
    }

    pub fn svm_path(&self) -> PathBuf {
        self.resolve(&self.svm)
    }
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            logistic_regression_threshold: LOGISTIC_REGRESSION_THRESHOLD,
            spam_votes_required: SPAM_VOTES_REQUIRED,
            spam_label: ClassLabel::Int(1),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Config written by `--generate-config`, with logging spelled out.
    pub fn generated() -> Self {
        Self {
            logging: Some(LoggingConfig {
                level: "info".to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let threshold = self.ensemble.logistic_regression_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!(
                "logistic_regression_threshold must be within [0, 1], got {}",
                threshold
            );
        }
        if !(1..=3).contains(&self.ensemble.spam_votes_required) {
            bail!(
                "spam_votes_required must be between 1 and 3, got {}",
                self.ensemble.spam_votes_required
            );
        }
        if self.session.history_preview_chars == 0 {
            bail!("history_preview_chars must be greater than 0");
        }
        Ok(())
    }
}
