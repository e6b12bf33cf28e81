/// Error type for embedding tables and sources
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Vocabulary size or embedding dimension is zero
    #[error("invalid table shape {vocab_size}x{dim}: both dimensions must be positive")]
    InvalidDimension {
        /// requested row count
        vocab_size: usize,
        /// requested column count
        dim: usize,
    },
    /// Row id outside `0..len`
    #[error("id {id} out of range for table with {len} rows")]
    IndexOutOfRange {
        /// requested id
        id: usize,
        /// number of rows
        len: usize,
    },
    /// Operation not offered by this table, e.g. `update` on a frozen table
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    /// Buffer or vector length differs from what the shape requires
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// required number of values
        expected: usize,
        /// supplied number of values
        actual: usize,
    },
    /// Initialization policy parameters are unusable
    #[error("invalid init: {0}")]
    InvalidInit(String),
    /// Pretrained source has no vector for the key
    #[error("key not found in pretrained source: {0:?}")]
    KeyNotFound(String),
    /// Malformed line in a text vector file
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// what was wrong with it
        reason: String,
    },
    /// Weight blob length is not a multiple of four bytes
    #[error("weight blob has {0} trailing bytes")]
    TrailingBytes(usize),
    /// Reading or writing a file failed
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
