/// Error type for vocabulary lookups and persistence
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    /// Token is not part of the vocabulary and no unknown id is reserved
    #[error("token not found: {0:?}")]
    TokenNotFound(String),
    /// Reading or writing a vocabulary file failed
    #[error("vocabulary io: {0}")]
    Io(#[from] std::io::Error),
    /// Vocabulary bytes could not be encoded or decoded
    #[error("vocabulary codec: {0}")]
    Codec(#[from] bincode::Error),
    /// Decoded vocabulary violates the id invariants
    #[error("corrupt vocabulary: {0}")]
    Corrupt(String),
}
