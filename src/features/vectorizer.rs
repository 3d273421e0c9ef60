//! Pre-fitted TF-IDF vectorizer
//!
//! Reproduces the transform step of a fitted scikit-learn `TfidfVectorizer`
//! (or `CountVectorizer`, with `use_idf: false` and `norm: null`) from an
//! exported JSON artifact. The vocabulary and weights are frozen at load time.

use super::{FeatureExtractor, FeatureVector};
use crate::error::{ArtifactError, ClassifyError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk shape of the vectorizer artifact. Fields outside this set
/// (`analyzer`, `binary`, `strip_accents`, ...) change the transform and are
/// rejected at load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl VectorizerArtifact {
    /// Artifact with default settings over the given vocabulary and idf table.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            sublinear_tf: false,
            use_idf: true,
            norm: default_norm(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    artifact: VectorizerArtifact,
    tokenizer: Regex,
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ArtifactError> {
        let n_features = artifact.vocabulary.len();
        if n_features == 0 {
            return Err(ArtifactError::invalid("vectorizer", "empty vocabulary"));
        }

        let mut seen = vec![false; n_features];
        for (term, &idx) in &artifact.vocabulary {
            if idx >= n_features || seen[idx] {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("term '{}' has invalid or duplicate index {}", term, idx),
                ));
            }
            seen[idx] = true;
        }

        if artifact.use_idf {
            if artifact.idf.len() != n_features {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!(
                        "idf table has {} entries for {} vocabulary terms",
                        artifact.idf.len(),
                        n_features
                    ),
                ));
            }
            if artifact.idf.iter().any(|w| !w.is_finite()) {
                return Err(ArtifactError::invalid("vectorizer", "non-finite idf weight"));
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::invalid(
                "vectorizer",
                format!("invalid ngram_range ({}, {})", min_n, max_n),
            ));
        }

        let tokenizer = Regex::new(&artifact.token_pattern).map_err(|e| {
            ArtifactError::invalid("vectorizer", format!("bad token_pattern: {}", e))
        })?;

        let stop_words = artifact.stop_words.iter().cloned().collect();

        log::info!(
            "Vectorizer ready: {} terms, ngram_range {:?}, idf={}, norm={:?}",
            n_features,
            artifact.ngram_range,
            artifact.use_idf,
            artifact.norm
        );

        Ok(Self {
            artifact,
            tokenizer,
            stop_words,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.artifact.vocabulary.len()
    }

    pub fn artifact(&self) -> &VectorizerArtifact {
        &self.artifact
    }

    /// Split text into the terms the vocabulary is keyed on.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text: Cow<'_, str> = if self.artifact.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let tokens: Vec<&str> = self
            .tokenizer
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let (min_n, max_n) = self.artifact.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    fn weight(&self, idx: usize, count: f64) -> Result<f64, ClassifyError> {
        let tf = if self.artifact.sublinear_tf {
            1.0 + count.ln()
        } else {
            count
        };

        if !self.artifact.use_idf {
            return Ok(tf);
        }

        self.artifact
            .idf
            .get(idx)
            .map(|idf| tf * idf)
            .ok_or_else(|| {
                ClassifyError::FeatureExtraction(format!("no idf weight for feature {}", idx))
            })
    }
}

impl FeatureExtractor for TfidfVectorizer {
    fn extract(&self, text: &str) -> Result<FeatureVector, ClassifyError> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(text) {
            if let Some(&idx) = self.artifact.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted = Vec::with_capacity(counts.len());
        for (idx, count) in counts {
            weighted.push((idx, self.weight(idx, count)?));
        }

        let norm = match self.artifact.norm {
            Some(Norm::L2) => weighted.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => weighted.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 && norm != 1.0 {
            for (_, value) in weighted.iter_mut() {
                *value /= norm;
            }
        }

        Ok(FeatureVector::new(self.dimension(), weighted))
    }

    fn dimension(&self) -> usize {
        self.artifact.vocabulary.len()
    }

    fn name(&self) -> &str {
        "TF-IDF Vectorizer"
    }
}
