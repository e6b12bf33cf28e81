#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Embedding tables: a `V x D` row-major `f32` matrix addressed by token id.
//!
//! Contracts: every operation returns a `Result` for invalid input; the same
//! [`Init`] (seed included) always produces the same table.
//!
//! Layout:
//! - `init.rs` — initialization policies and the seeded RNG
//! - `table.rs` — `EmbeddingTable` storage, `row` / `update`
//! - `lookup.rs` — stacked multi-row lookup
//! - `adapter.rs` — `Embeddings` capability trait, frozen/trainable wrappers
//! - `source.rs` / `text.rs` — pretrained key -> vector sources
//! - `loader.rs` — little-endian f32 weight blobs
//!
//! Frozen tables are `Sync` and may be read from many threads. Trainable
//! tables need the caller's own lock around `update`.

/// Frozen/trainable capability adapters.
pub mod adapter;
/// Error type.
pub mod error;
/// Initialization policies.
pub mod init;
/// Raw f32 weight files.
pub mod loader;
/// Multi-row lookup.
pub mod lookup;
/// Pretrained vector sources.
pub mod source;
/// Dense table storage.
pub mod table;
/// Whitespace-separated text vector files.
pub mod text;

pub use adapter::{Embeddings, FrozenTable, Table, TrainableTable};
pub use error::EmbeddingError;
pub use init::Init;
pub use lookup::{lookup, LookupResult};
pub use source::{InMemorySource, PretrainedSource};
pub use table::EmbeddingTable;
