#![forbid(unsafe_code)]

use tracing::{debug, trace, warn};

use crate::error::EmbeddingError;
use crate::init::Init;
use crate::source::PretrainedSource;

/// Dense embedding matrix: `vocab_size` rows of `dim` values, row-major.
///
/// Row `i` is the vector for token id `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingTable {
    vocab_size: usize,
    dim: usize,
    data: Vec<f32>,
}

/// Number of values a `vocab_size x dim` table holds.
fn shape_len(vocab_size: usize, dim: usize) -> Result<usize, EmbeddingError> {
    if vocab_size == 0 || dim == 0 {
        return Err(EmbeddingError::InvalidDimension { vocab_size, dim });
    }
    vocab_size
        .checked_mul(dim)
        .ok_or(EmbeddingError::InvalidDimension { vocab_size, dim })
}

impl EmbeddingTable {
    /// Allocate a table and fill it with `init`.
    pub fn new(vocab_size: usize, dim: usize, init: &Init) -> Result<Self, EmbeddingError> {
        let len = shape_len(vocab_size, dim)?;
        let data = init.fill(len)?;
        debug!(vocab_size, dim, ?init, "allocated embedding table");
        Ok(Self {
            vocab_size,
            dim,
            data,
        })
    }

    /// Wrap an existing row-major buffer of exactly `vocab_size * dim` values.
    pub fn from_raw(vocab_size: usize, dim: usize, data: Vec<f32>) -> Result<Self, EmbeddingError> {
        let len = shape_len(vocab_size, dim)?;
        if data.len() != len {
            return Err(EmbeddingError::ShapeMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        Ok(Self {
            vocab_size,
            dim,
            data,
        })
    }

    /// Build a table whose row `i` is `source`'s vector for `tokens[i]`.
    ///
    /// Keys the source lacks take the matching row of a table initialized
    /// with `fallback`; without a fallback they fail with `KeyNotFound`.
    pub fn from_source<S, P>(
        tokens: &[S],
        source: &P,
        fallback: Option<&Init>,
    ) -> Result<Self, EmbeddingError>
    where
        S: AsRef<str>,
        P: PretrainedSource + ?Sized,
    {
        let dim = source.dim();
        let len = shape_len(tokens.len(), dim)?;
        let filler = match fallback {
            Some(init) => Some(init.fill(len)?),
            None => None,
        };

        let mut data = Vec::with_capacity(len);
        let mut missing = 0usize;
        for (id, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            match (source.vector(token), &filler) {
                (Ok(v), _) => {
                    if v.len() != dim {
                        return Err(EmbeddingError::ShapeMismatch {
                            expected: dim,
                            actual: v.len(),
                        });
                    }
                    data.extend_from_slice(&v);
                }
                (Err(EmbeddingError::KeyNotFound(_)), Some(fill)) => {
                    let start = id * dim;
                    let row = fill.get(start..start + dim).ok_or(EmbeddingError::ShapeMismatch {
                        expected: len,
                        actual: fill.len(),
                    })?;
                    warn!(token, id, "pretrained vector missing, using fallback init");
                    missing += 1;
                    data.extend_from_slice(row);
                }
                (Err(e), _) => return Err(e),
            }
        }
        debug!(
            vocab_size = tokens.len(),
            dim,
            missing,
            "built embedding table from pretrained source"
        );
        Self::from_raw(tokens.len(), dim, data)
    }

    /// Number of rows.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Number of columns.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Underlying row-major values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Rows in id order.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.dim)
    }

    fn span(&self, id: usize) -> Result<std::ops::Range<usize>, EmbeddingError> {
        if id >= self.vocab_size {
            return Err(EmbeddingError::IndexOutOfRange {
                id,
                len: self.vocab_size,
            });
        }
        let start = id * self.dim;
        Ok(start..start + self.dim)
    }

    /// Vector for `id`.
    pub fn row(&self, id: usize) -> Result<&[f32], EmbeddingError> {
        let span = self.span(id)?;
        self.data.get(span).ok_or(EmbeddingError::IndexOutOfRange {
            id,
            len: self.vocab_size,
        })
    }

    /// Overwrite row `id` with `values`.
    pub fn update(&mut self, id: usize, values: &[f32]) -> Result<(), EmbeddingError> {
        if values.len() != self.dim {
            return Err(EmbeddingError::ShapeMismatch {
                expected: self.dim,
                actual: values.len(),
            });
        }
        let span = self.span(id)?;
        let len = self.vocab_size;
        let row = self
            .data
            .get_mut(span)
            .ok_or(EmbeddingError::IndexOutOfRange { id, len })?;
        row.copy_from_slice(values);
        trace!(id, "updated embedding row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use proptest::prelude::*;

    #[test]
    fn fifty_dim_rows() {
        let table = EmbeddingTable::new(5, 50, &Init::default()).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!(row.len(), 50);
        assert!(row.iter().all(|&x| (0.0..1.0).contains(&x)));
        assert_eq!(table.rows().count(), 5);
    }

    #[test]
    fn zero_shape_is_rejected() {
        for (v, d) in [(0, 4), (4, 0), (0, 0)] {
            assert!(matches!(
                EmbeddingTable::new(v, d, &Init::Zeros),
                Err(EmbeddingError::InvalidDimension { .. })
            ));
        }
        assert!(matches!(
            EmbeddingTable::new(usize::MAX, 2, &Init::Zeros),
            Err(EmbeddingError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn row_out_of_range() {
        let table = EmbeddingTable::new(3, 2, &Init::Zeros).unwrap();
        assert!(matches!(
            table.row(3),
            Err(EmbeddingError::IndexOutOfRange { id: 3, len: 3 })
        ));
        assert!(table.row(usize::MAX).is_err());
    }

    #[test]
    fn update_is_observed() {
        let mut table = EmbeddingTable::new(3, 2, &Init::Zeros).unwrap();
        table.update(1, &[0.5, -0.5]).unwrap();
        assert_eq!(table.row(1).unwrap(), &[0.5, -0.5]);
        assert_eq!(table.row(0).unwrap(), &[0.0, 0.0]);
        assert_eq!(table.row(2).unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn update_checks_length_and_range() {
        let mut table = EmbeddingTable::new(2, 2, &Init::Zeros).unwrap();
        assert!(matches!(
            table.update(0, &[1.0]),
            Err(EmbeddingError::ShapeMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            table.update(2, &[1.0, 1.0]),
            Err(EmbeddingError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn from_raw_checks_length() {
        let table = EmbeddingTable::from_raw(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(table.row(1).unwrap(), &[3.0, 4.0]);
        assert!(matches!(
            EmbeddingTable::from_raw(2, 2, vec![1.0]),
            Err(EmbeddingError::ShapeMismatch { expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn from_source_fills_rows_in_token_order() {
        let mut src = InMemorySource::new(2);
        src.insert("a", vec![1.0, 1.0]).unwrap();
        src.insert("b", vec![2.0, 2.0]).unwrap();
        let table = EmbeddingTable::from_source(&["b", "a"], &src, None).unwrap();
        assert_eq!(table.as_slice(), &[2.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn from_source_missing_key() {
        let mut src = InMemorySource::new(2);
        src.insert("a", vec![1.0, 1.0]).unwrap();
        assert!(matches!(
            EmbeddingTable::from_source(&["a", "zz"], &src, None),
            Err(EmbeddingError::KeyNotFound(k)) if k == "zz"
        ));
        let table =
            EmbeddingTable::from_source(&["a", "zz"], &src, Some(&Init::Constant { value: 9.0 })).unwrap();
        assert_eq!(table.row(1).unwrap(), &[9.0, 9.0]);
    }

    proptest! {
        #[test]
        fn fresh_rows_respect_init(v in 1usize..16, d in 1usize..16, seed in any::<u64>()) {
            let init = Init::Uniform { low: -1.0, high: 1.0, seed };
            let table = EmbeddingTable::new(v, d, &init).unwrap();
            for id in 0..v {
                let row = table.row(id).unwrap();
                prop_assert_eq!(row.len(), d);
                prop_assert!(row.iter().all(|&x| init.admits(x)));
            }
        }
    }
}
