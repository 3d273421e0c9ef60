pub mod vectorizer;

pub use vectorizer::{Norm, TfidfVectorizer, VectorizerArtifact};

use crate::error::ClassifyError;

/// Fixed-width feature encoding of one text, stored as sorted `(index, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector from sparse entries. Entries are sorted by index, zeros
    /// and indices outside `dimension` are dropped, and duplicates are summed.
    pub fn new(dimension: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut sorted: Vec<(usize, f64)> = entries
            .into_iter()
            .filter(|&(idx, value)| idx < dimension && value != 0.0)
            .collect();
        sorted.sort_by_key(|&(idx, _)| idx);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(sorted.len());
        for (idx, value) in sorted {
            match merged.last_mut() {
                Some(last) if last.0 == idx => last.1 += value,
                _ => merged.push((idx, value)),
            }
        }

        Self {
            dimension,
            entries: merged,
        }
    }

    pub fn from_dense(values: &[f64]) -> Self {
        Self::new(values.len(), values.iter().copied().enumerate())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(idx, _)| idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Sparse dot product. Callers check `dimension` against `weights` first;
    /// weights beyond the slice contribute nothing.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(idx, value)| weights.get(idx).map(|w| w * value))
            .sum()
    }
}

/// Turns raw text into the feature space the classifiers were fitted on.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<FeatureVector, ClassifyError>;
    /// Width of every vector this extractor produces.
    fn dimension(&self) -> usize;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_and_merges() {
        let vector = FeatureVector::new(5, vec![(3, 1.0), (1, 2.0), (3, 0.5), (9, 4.0), (2, 0.0)]);
        assert_eq!(vector.dimension(), 5);
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(vector.get(3), 1.5);
        assert_eq!(vector.get(0), 0.0);
    }

    #[test]
    fn test_dot_product() {
        let vector = FeatureVector::from_dense(&[1.0, 0.0, 2.0]);
        assert_eq!(vector.dot(&[0.5, 10.0, -1.0]), -1.5);
        assert!(FeatureVector::new(3, Vec::new()).is_empty());
    }
}
