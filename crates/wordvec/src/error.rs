use embedding::EmbeddingError;
use tokenize::VocabError;

/// Error type for the text embedding pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Vocabulary lookup or persistence failed
    #[error(transparent)]
    Vocab(#[from] VocabError),
    /// Table construction, lookup or update failed
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    /// Configuration could not be parsed
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
    /// Configuration parsed but holds unusable values
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Reading a configuration file failed
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Corpus produced no tokens
    #[error("corpus contains no tokens")]
    EmptyCorpus,
}
