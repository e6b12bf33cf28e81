#![forbid(unsafe_code)]

use rayon::prelude::*;

use crate::error::EmbeddingError;
use crate::lookup::{lookup, LookupResult};
use crate::table::EmbeddingTable;

/// Capability set shared by every way of obtaining embeddings: `id -> vector`.
///
/// `update` is only offered by trainable implementations; the default
/// refuses with [`EmbeddingError::UnsupportedOperation`].
pub trait Embeddings {
    /// Number of addressable ids.
    fn vocab_size(&self) -> usize;

    /// Length of every vector.
    fn dim(&self) -> usize;

    /// Vector for `id`.
    fn row(&self, id: usize) -> Result<&[f32], EmbeddingError>;

    /// Stacked vectors for `ids`, in order.
    fn lookup(&self, ids: &[usize]) -> Result<LookupResult, EmbeddingError> {
        lookup(self, ids)
    }

    /// Whether `update` is supported.
    fn is_trainable(&self) -> bool {
        false
    }

    /// Overwrite the vector for `id`.
    fn update(&mut self, _id: usize, _values: &[f32]) -> Result<(), EmbeddingError> {
        Err(EmbeddingError::UnsupportedOperation("update on a frozen table"))
    }
}

/// Read-only table. Safe to share across threads without locking.
#[derive(Clone, Debug, PartialEq)]
pub struct FrozenTable {
    table: EmbeddingTable,
}

impl FrozenTable {
    /// Freeze `table`.
    pub fn new(table: EmbeddingTable) -> Self {
        Self { table }
    }

    /// Borrow the underlying storage.
    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    /// Unwrap the underlying storage.
    pub fn into_inner(self) -> EmbeddingTable {
        self.table
    }

    /// Same result as [`Embeddings::lookup`], rows gathered on the rayon pool.
    pub fn par_lookup(&self, ids: &[usize]) -> Result<LookupResult, EmbeddingError> {
        let rows = ids
            .par_iter()
            .map(|&id| self.table.row(id))
            .collect::<Result<Vec<&[f32]>, EmbeddingError>>()?;
        let mut out = LookupResult::with_capacity(self.table.dim(), rows.len());
        for row in rows {
            out.push(row);
        }
        Ok(out)
    }
}

impl Embeddings for FrozenTable {
    fn vocab_size(&self) -> usize {
        self.table.vocab_size()
    }

    fn dim(&self) -> usize {
        self.table.dim()
    }

    fn row(&self, id: usize) -> Result<&[f32], EmbeddingError> {
        self.table.row(id)
    }
}

/// Table whose rows may be overwritten in place.
///
/// No internal locking: callers updating from several threads must wrap it
/// in their own `Mutex`/`RwLock`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainableTable {
    table: EmbeddingTable,
}

impl TrainableTable {
    /// Make `table` trainable.
    pub fn new(table: EmbeddingTable) -> Self {
        Self { table }
    }

    /// Borrow the underlying storage.
    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    /// Stop training; the result rejects further updates.
    pub fn freeze(self) -> FrozenTable {
        FrozenTable::new(self.table)
    }
}

impl Embeddings for TrainableTable {
    fn vocab_size(&self) -> usize {
        self.table.vocab_size()
    }

    fn dim(&self) -> usize {
        self.table.dim()
    }

    fn row(&self, id: usize) -> Result<&[f32], EmbeddingError> {
        self.table.row(id)
    }

    fn is_trainable(&self) -> bool {
        true
    }

    fn update(&mut self, id: usize, values: &[f32]) -> Result<(), EmbeddingError> {
        self.table.update(id, values)
    }
}

/// Frozen or trainable table, picked at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Table {
    /// read-only
    Frozen(FrozenTable),
    /// updatable
    Trainable(TrainableTable),
}

impl Table {
    /// Wrap `table` according to `trainable`.
    pub fn new(table: EmbeddingTable, trainable: bool) -> Self {
        if trainable {
            Table::Trainable(TrainableTable::new(table))
        } else {
            Table::Frozen(FrozenTable::new(table))
        }
    }

    /// Borrow the underlying storage.
    pub fn table(&self) -> &EmbeddingTable {
        match self {
            Table::Frozen(t) => t.table(),
            Table::Trainable(t) => t.table(),
        }
    }

    fn inner(&self) -> &dyn Embeddings {
        match self {
            Table::Frozen(t) => t,
            Table::Trainable(t) => t,
        }
    }
}

impl Embeddings for Table {
    fn vocab_size(&self) -> usize {
        self.inner().vocab_size()
    }

    fn dim(&self) -> usize {
        self.inner().dim()
    }

    fn row(&self, id: usize) -> Result<&[f32], EmbeddingError> {
        self.inner().row(id)
    }

    fn is_trainable(&self) -> bool {
        self.inner().is_trainable()
    }

    fn update(&mut self, id: usize, values: &[f32]) -> Result<(), EmbeddingError> {
        match self {
            Table::Frozen(t) => t.update(id, values),
            Table::Trainable(t) => t.update(id, values),
        }
    }
}
