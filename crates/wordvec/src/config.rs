#![forbid(unsafe_code)]

use std::path::Path;

use embedding::Init;
use serde::{Deserialize, Serialize};
use tokenize::{OovPolicy, Tokenizer};

use crate::error::Error;

/// Settings for [`crate::TextEmbedder`], loadable from JSON.
///
/// Every field is optional in JSON; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// vector length (default 50); ignored when rows come from a pretrained source
    pub dim: usize,
    /// row initializer, also the fallback for words a pretrained source lacks
    pub init: Init,
    /// allow `update` on the resulting table
    pub trainable: bool,
    /// out-of-vocabulary handling
    pub oov: OovPolicy,
    /// characters stripped by the tokenizer; `None` keeps ASCII punctuation
    pub punctuation: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dim: 50,
            init: Init::default(),
            trainable: false,
            oov: OovPolicy::Fail,
            punctuation: None,
        }
    }
}

impl EmbeddingConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject settings no table could be built from.
    pub fn validate(&self) -> Result<(), Error> {
        if self.dim == 0 {
            return Err(Error::InvalidConfig("dim must be positive".to_string()));
        }
        if let OovPolicy::Unknown { token } = &self.oov {
            if token.is_empty() {
                return Err(Error::InvalidConfig("unknown token must not be empty".to_string()));
            }
        }
        self.init
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Tokenizer described by `punctuation`.
    pub fn tokenizer(&self) -> Tokenizer {
        match &self.punctuation {
            Some(chars) => Tokenizer::with_punctuation(chars.chars()),
            None => Tokenizer::new(),
        }
    }
}
