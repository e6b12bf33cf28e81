#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::EmbeddingError;
use crate::table::EmbeddingTable;

/// Decode little-endian f32 values. A trailing partial word is an error.
pub fn f32_from_le_bytes(bytes: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
    let chunks = bytes.chunks_exact(4);
    let rest = chunks.remainder().len();
    if rest != 0 {
        return Err(EmbeddingError::TrailingBytes(rest));
    }
    Ok(chunks
        .map(|b| {
            let mut word = [0u8; 4];
            word.copy_from_slice(b);
            f32::from_le_bytes(word)
        })
        .collect())
}

/// Encode values as little-endian f32.
pub fn f32_to_le_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Load file containing f32 values in little-endian and return Vec<f32>
pub fn load_f32_file<P: AsRef<Path>>(path: P) -> Result<Vec<f32>, EmbeddingError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let values = f32_from_le_bytes(&bytes)?;
    debug!(path = %path.display(), values = values.len(), "loaded f32 weights");
    Ok(values)
}

impl EmbeddingTable {
    /// Table from a little-endian f32 blob of exactly `vocab_size * dim` values.
    pub fn from_le_bytes(bytes: &[u8], vocab_size: usize, dim: usize) -> Result<Self, EmbeddingError> {
        Self::from_raw(vocab_size, dim, f32_from_le_bytes(bytes)?)
    }

    /// Table from a weight file written by [`EmbeddingTable::save_f32_file`].
    pub fn from_f32_file<P: AsRef<Path>>(
        path: P,
        vocab_size: usize,
        dim: usize,
    ) -> Result<Self, EmbeddingError> {
        Self::from_raw(vocab_size, dim, load_f32_file(path)?)
    }

    /// Row-major little-endian f32 bytes; the shape is not stored.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        f32_to_le_bytes(self.as_slice())
    }

    /// Write the table as a raw little-endian f32 blob.
    pub fn save_f32_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EmbeddingError> {
        fs::write(path, self.to_le_bytes())?;
        Ok(())
    }
}
