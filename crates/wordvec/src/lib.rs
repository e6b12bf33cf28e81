#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Word vectors from raw text.
//!
//! [`TextEmbedder`] ties the pieces together: the `tokenize` crate turns a
//! corpus into a sorted vocabulary, the `embedding` crate holds one row per
//! vocabulary id, and lookups go text -> tokens -> ids -> rows.
//!
//! ```
//! use wordvec::{EmbeddingConfig, TextEmbedder};
//!
//! let cfg = EmbeddingConfig::default();
//! let embedder = TextEmbedder::from_corpus("Quo usque tandem abutere, Catilina?", &cfg)?;
//! let vectors = embedder.embed("catilina quo")?;
//! assert_eq!(vectors.len(), 2);
//! assert_eq!(vectors.dim(), 50);
//! # Ok::<(), wordvec::Error>(())
//! ```

/// Pipeline configuration.
pub mod config;
/// Text -> vectors pipeline.
pub mod embedder;
/// Unified error type.
pub mod error;

pub use config::EmbeddingConfig;
pub use embedder::TextEmbedder;
pub use error::Error;

pub use embedding::{
    EmbeddingError, EmbeddingTable, Embeddings, FrozenTable, InMemorySource, Init, LookupResult,
    PretrainedSource, Table, TrainableTable,
};
pub use embedding::text::{read_text, read_text_file};
pub use tokenize::{OovPolicy, Tokenizer, VocabError, Vocabulary};
