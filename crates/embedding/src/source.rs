#![forbid(unsafe_code)]

use std::collections::HashMap;

use crate::error::EmbeddingError;

/// Externally computed vectors addressed by word.
///
/// Where the vectors come from (file, network, constant) is up to the
/// implementation; callers only rely on `dim` and `vector`.
pub trait PretrainedSource {
    /// Length of every vector.
    fn dim(&self) -> usize;

    /// Vector for `key`, or [`EmbeddingError::KeyNotFound`].
    fn vector(&self, key: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Whether `key` has a vector.
    ///
    /// The default builds the whole vector through [`PretrainedSource::vector`]
    /// and drops it. Sources with a cheap membership test should override it,
    /// as [`InMemorySource`] does.
    fn contains(&self, key: &str) -> bool {
        self.vector(key).is_ok()
    }
}

/// Key -> vector map held in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemorySource {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl InMemorySource {
    /// Empty source accepting vectors of length `dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: HashMap::new(),
        }
    }

    /// Source filled from `(key, vector)` pairs; later duplicates replace earlier ones.
    pub fn from_pairs<I, K>(dim: usize, pairs: I) -> Result<Self, EmbeddingError>
    where
        I: IntoIterator<Item = (K, Vec<f32>)>,
        K: Into<String>,
    {
        let mut src = Self::new(dim);
        for (k, v) in pairs {
            src.insert(k, v)?;
        }
        Ok(src)
    }

    /// Add or replace the vector for `key`; the length must equal `dim`.
    pub fn insert<K: Into<String>>(&mut self, key: K, vector: Vec<f32>) -> Result<(), EmbeddingError> {
        if vector.len() != self.dim {
            return Err(EmbeddingError::ShapeMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        self.vectors.insert(key.into(), vector);
        Ok(())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.vectors.keys().map(String::as_str)
    }
}

impl PretrainedSource for InMemorySource {
    fn dim(&self) -> usize {
        self.dim
    }

    fn vector(&self, key: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.vectors
            .get(key)
            .cloned()
            .ok_or_else(|| EmbeddingError::KeyNotFound(key.to_string()))
    }

    fn contains(&self, key: &str) -> bool {
        self.vectors.contains_key(key)
    }
}
