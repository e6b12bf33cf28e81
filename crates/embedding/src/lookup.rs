#![forbid(unsafe_code)]

use crate::adapter::Embeddings;
use crate::error::EmbeddingError;

/// Rows gathered by a lookup, stacked in request order.
///
/// Owns copies of the rows; the source table is untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupResult {
    dim: usize,
    data: Vec<f32>,
}

impl LookupResult {
    pub(crate) fn with_capacity(dim: usize, rows: usize) -> Self {
        Self {
            dim,
            data: Vec::with_capacity(dim * rows),
        }
    }

    pub(crate) fn push(&mut self, row: &[f32]) {
        self.data.extend_from_slice(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    /// True when no ids were requested.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Width of every row.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The `k`-th row.
    pub fn row(&self, k: usize) -> Option<&[f32]> {
        let start = k.checked_mul(self.dim)?;
        self.data.get(start..start.checked_add(self.dim)?)
    }

    /// Rows in request order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(self.dim.max(1))
    }

    /// Stacked row-major values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// One owned vector per row.
    pub fn into_vec(self) -> Vec<Vec<f32>> {
        self.rows().map(<[f32]>::to_vec).collect()
    }
}

/// Gather `table.row(id)` for every id, keeping order and duplicates.
///
/// Fails on the first invalid id with no partial result.
pub fn lookup<E>(table: &E, ids: &[usize]) -> Result<LookupResult, EmbeddingError>
where
    E: Embeddings + ?Sized,
{
    let mut out = LookupResult::with_capacity(table.dim(), ids.len());
    for &id in ids {
        out.push(table.row(id)?);
    }
    Ok(out)
}
