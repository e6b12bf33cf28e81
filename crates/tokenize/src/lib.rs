#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Text normalization and vocabulary construction for embedding lookups.
//!
//! Contract: identical token multiset -> identical token/id mapping, whatever
//! order the tokens arrive in.
//!
//! Layout:
//! - `tokenizer.rs` — punctuation stripping, lowercasing, whitespace split
//! - `vocabulary.rs` — sorted, contiguous id assignment and OOV policy
//! - `error.rs` — `VocabError`

/// Vocabulary errors.
pub mod error;
/// Punctuation-stripping tokenizer.
pub mod tokenizer;
/// Deterministic vocabulary builder and persistence.
pub mod vocabulary;

pub use error::VocabError;
pub use tokenizer::{detokenize, Tokenizer, DEFAULT_PUNCTUATION};
pub use vocabulary::{OovPolicy, Vocabulary};
