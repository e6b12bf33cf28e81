#![forbid(unsafe_code)]

use embedding::{EmbeddingTable, Embeddings, LookupResult, PretrainedSource, Table};
use tokenize::{Tokenizer, Vocabulary};
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::Error;

/// Tokenizer, vocabulary and table built from one corpus.
///
/// Row `i` of the table belongs to vocabulary id `i`.
#[derive(Clone, Debug)]
pub struct TextEmbedder {
    tokenizer: Tokenizer,
    vocab: Vocabulary,
    table: Table,
}

impl TextEmbedder {
    /// Build the vocabulary of `corpus` and a freshly initialized `dim`-wide table.
    pub fn from_corpus(corpus: &str, config: &EmbeddingConfig) -> Result<Self, Error> {
        config.validate()?;
        let (tokenizer, vocab) = Self::build_vocabulary(corpus, config)?;
        let table = EmbeddingTable::new(vocab.len(), config.dim, &config.init)?;
        Ok(Self::assemble(tokenizer, vocab, table, config.trainable))
    }

    /// Like [`TextEmbedder::from_corpus`] but rows come from `source`.
    ///
    /// Words the source lacks, including a reserved unknown token, get the
    /// matching row of `config.init`. The table takes the source's dimension.
    pub fn from_pretrained<P>(corpus: &str, config: &EmbeddingConfig, source: &P) -> Result<Self, Error>
    where
        P: PretrainedSource + ?Sized,
    {
        config.validate()?;
        let (tokenizer, vocab) = Self::build_vocabulary(corpus, config)?;
        let table = EmbeddingTable::from_source(vocab.tokens(), source, Some(&config.init))?;
        Ok(Self::assemble(tokenizer, vocab, table, config.trainable))
    }

    /// Combine already built parts. Fails when the table has a different
    /// number of rows than the vocabulary has ids.
    pub fn from_parts(tokenizer: Tokenizer, vocab: Vocabulary, table: Table) -> Result<Self, Error> {
        if table.vocab_size() != vocab.len() {
            return Err(Error::InvalidConfig(format!(
                "table has {} rows but vocabulary has {} ids",
                table.vocab_size(),
                vocab.len()
            )));
        }
        Ok(Self {
            tokenizer,
            vocab,
            table,
        })
    }

    fn build_vocabulary(corpus: &str, config: &EmbeddingConfig) -> Result<(Tokenizer, Vocabulary), Error> {
        let tokenizer = config.tokenizer();
        let tokens = tokenizer.tokenize(corpus);
        if tokens.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let vocab = Vocabulary::build(&tokens, &config.oov);
        Ok((tokenizer, vocab))
    }

    fn assemble(tokenizer: Tokenizer, vocab: Vocabulary, table: EmbeddingTable, trainable: bool) -> Self {
        debug!(
            vocab_size = vocab.len(),
            dim = table.dim(),
            trainable,
            "assembled text embedder"
        );
        Self {
            tokenizer,
            vocab,
            table: Table::new(table, trainable),
        }
    }

    /// Tokenizer used for corpus and queries.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Token -> id mapping.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Embedding rows, one per vocabulary id.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Vector length.
    pub fn dim(&self) -> usize {
        self.table.dim()
    }

    /// Ids of the tokens of `text`, in order.
    pub fn ids(&self, text: &str) -> Result<Vec<usize>, Error> {
        let tokens = self.tokenizer.tokenize(text);
        Ok(self.vocab.ids(&tokens)?)
    }

    /// One vector per token of `text`, in order.
    pub fn embed(&self, text: &str) -> Result<LookupResult, Error> {
        let ids = self.ids(text)?;
        Ok(self.table.lookup(&ids)?)
    }

    /// Vector of a single already normalized token.
    pub fn embed_token(&self, token: &str) -> Result<Vec<f32>, Error> {
        let id = self.vocab.id(token)?;
        Ok(self.table.row(id)?.to_vec())
    }

    /// Overwrite the vector of `token`; frozen tables refuse.
    pub fn update_token(&mut self, token: &str, vector: &[f32]) -> Result<(), Error> {
        let id = self.vocab.id(token)?;
        self.table.update(id, vector)?;
        Ok(())
    }
}
