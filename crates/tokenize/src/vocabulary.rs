#![forbid(unsafe_code)]

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VocabError;

/// What to do with a token that did not occur in the corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OovPolicy {
    /// Lookup fails with [`VocabError::TokenNotFound`].
    #[default]
    Fail,
    /// Unseen tokens map to the id of `token`. If `token` is not in the
    /// corpus it is appended after the sorted corpus tokens.
    Unknown {
        /// text of the unknown token, e.g. `"<unk>"`
        token: String,
    },
}

/// Immutable token -> id mapping with ids `0..len()` in sorted token order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    id_to_token: Vec<String>,
    token_to_id: HashMap<String, usize>,
    unknown_id: Option<usize>,
}

/// On-disk form; the reverse map is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct Stored {
    id_to_token: Vec<String>,
    unknown_id: Option<usize>,
}

impl Vocabulary {
    /// Build a vocabulary that fails on unseen tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(tokens, &OovPolicy::Fail)
    }

    /// Deduplicate `tokens`, sort them by byte order and number them from 0.
    pub fn build<I, S>(tokens: I, policy: &OovPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect();
        let mut id_to_token: Vec<String> = distinct.into_iter().collect();
        let corpus_len = id_to_token.len();

        let unknown_id = match policy {
            OovPolicy::Fail => None,
            OovPolicy::Unknown { token } => match id_to_token.binary_search(token) {
                Ok(id) => Some(id),
                Err(_) => {
                    id_to_token.push(token.clone());
                    Some(corpus_len)
                }
            },
        };

        let token_to_id = index(&id_to_token);
        debug!(
            distinct = corpus_len,
            size = id_to_token.len(),
            unknown = ?unknown_id,
            "built vocabulary"
        );
        Self {
            id_to_token,
            token_to_id,
            unknown_id,
        }
    }

    /// Number of ids, including a reserved unknown id.
    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    /// True when the vocabulary holds no ids.
    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    /// Id that unseen tokens resolve to, if the policy reserved one.
    pub fn unknown_id(&self) -> Option<usize> {
        self.unknown_id
    }

    /// True when `token` has its own id (the unknown fallback does not count).
    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Id of `token`, or the unknown id for unseen tokens.
    pub fn id(&self, token: &str) -> Result<usize, VocabError> {
        self.token_to_id
            .get(token)
            .copied()
            .or(self.unknown_id)
            .ok_or_else(|| VocabError::TokenNotFound(token.to_string()))
    }

    /// Ids of `tokens` in order; fails on the first unresolvable token.
    pub fn ids<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>, VocabError> {
        tokens.iter().map(|t| self.id(t.as_ref())).collect()
    }

    /// Token text for `id`.
    pub fn token(&self, id: usize) -> Option<&str> {
        self.id_to_token.get(id).map(String::as_str)
    }

    /// All tokens, indexed by id.
    pub fn tokens(&self) -> &[String] {
        &self.id_to_token
    }

    /// `(token, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.id_to_token
            .iter()
            .enumerate()
            .map(|(id, t)| (t.as_str(), id))
    }

    /// Serialize with bincode into `writer`.
    pub fn save_to<W: Write>(&self, writer: W) -> Result<(), VocabError> {
        let stored = Stored {
            id_to_token: self.id_to_token.clone(),
            unknown_id: self.unknown_id,
        };
        bincode::serialize_into(writer, &stored)?;
        Ok(())
    }

    /// Decode a vocabulary written by [`Vocabulary::save_to`].
    pub fn load_from<R: Read>(reader: R) -> Result<Self, VocabError> {
        let stored: Stored = bincode::deserialize_from(reader)?;
        Self::from_stored(stored)
    }

    /// Save to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), VocabError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VocabError> {
        let reader = BufReader::new(File::open(path)?);
        Self::load_from(reader)
    }

    fn from_stored(stored: Stored) -> Result<Self, VocabError> {
        let Stored {
            id_to_token,
            unknown_id,
        } = stored;
        if let Some(id) = unknown_id {
            if id >= id_to_token.len() {
                return Err(VocabError::Corrupt(format!(
                    "unknown id {id} outside 0..{}",
                    id_to_token.len()
                )));
            }
        }
        let token_to_id = index(&id_to_token);
        if token_to_id.len() != id_to_token.len() {
            return Err(VocabError::Corrupt("duplicate tokens".to_string()));
        }
        // an appended unknown token is the only entry allowed out of order
        let corpus = match (unknown_id, id_to_token.split_last()) {
            (Some(id), Some((_, rest))) if id == rest.len() => rest,
            _ => id_to_token.as_slice(),
        };
        if !corpus.windows(2).all(|w| matches!(w, [a, b] if a < b)) {
            return Err(VocabError::Corrupt("tokens are not in sorted order".to_string()));
        }
        Ok(Self {
            id_to_token,
            token_to_id,
            unknown_id,
        })
    }
}

fn index(id_to_token: &[String]) -> HashMap<String, usize> {
    id_to_token
        .iter()
        .enumerate()
        .map(|(id, t)| (t.clone(), id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tokenizer;
    use proptest::prelude::*;

    fn catilina() -> Vocabulary {
        let toks = Tokenizer::new().tokenize("Quo usque tandem abutere, Catilina?");
        Vocabulary::from_tokens(&toks)
    }

    #[test]
    fn ids_follow_sorted_order() {
        let vocab = catilina();
        let pairs: Vec<(&str, usize)> = vocab.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("abutere", 0),
                ("catilina", 1),
                ("quo", 2),
                ("tandem", 3),
                ("usque", 4)
            ]
        );
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.token(3), Some("tandem"));
        assert_eq!(vocab.token(5), None);
    }

    #[test]
    fn duplicates_collapse() {
        let vocab = Vocabulary::from_tokens(["b", "a", "b", "a", "c"]);
        assert_eq!(vocab.tokens(), ["a", "b", "c"]);
        assert_eq!(vocab.ids(&["c", "a", "c"]).unwrap(), vec![2, 0, 2]);
    }

    #[test]
    fn missing_token_fails_under_fail_policy() {
        let vocab = catilina();
        match vocab.id("cicero") {
            Err(VocabError::TokenNotFound(t)) => assert_eq!(t, "cicero"),
            other => panic!("expected TokenNotFound, got {other:?}"),
        }
        assert!(vocab.ids(&["quo", "cicero"]).is_err());
    }

    #[test]
    fn unknown_token_is_appended_after_corpus_ids() {
        let policy = OovPolicy::Unknown {
            token: "<unk>".to_string(),
        };
        let vocab = Vocabulary::build(["quo", "usque"], &policy);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.id("quo").unwrap(), 0);
        assert_eq!(vocab.id("usque").unwrap(), 1);
        assert_eq!(vocab.unknown_id(), Some(2));
        assert_eq!(vocab.id("cicero").unwrap(), 2);
        assert!(!vocab.contains("cicero"));
    }

    #[test]
    fn unknown_token_already_in_corpus_keeps_its_id() {
        let policy = OovPolicy::Unknown {
            token: "b".to_string(),
        };
        let vocab = Vocabulary::build(["a", "b", "c"], &policy);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.unknown_id(), Some(1));
        assert_eq!(vocab.id("zzz").unwrap(), 1);
    }

    #[test]
    fn empty_corpus_gives_empty_vocabulary() {
        let vocab = Vocabulary::from_tokens(Vec::<String>::new());
        assert!(vocab.is_empty());
        assert!(vocab.id("a").is_err());
    }

    #[test]
    fn save_load_roundtrip() {
        let policy = OovPolicy::Unknown {
            token: "<unk>".to_string(),
        };
        let vocab = Vocabulary::build(["quo", "usque", "tandem"], &policy);
        let mut buf = Vec::new();
        vocab.save_to(&mut buf).unwrap();
        let loaded = Vocabulary::load_from(buf.as_slice()).unwrap();
        assert_eq!(loaded, vocab);
        assert_eq!(loaded.id("nobody").unwrap(), 3);
    }

    #[test]
    fn load_rejects_out_of_range_unknown_id() {
        let stored = Stored {
            id_to_token: vec!["a".to_string()],
            unknown_id: Some(4),
        };
        let bytes = bincode::serialize(&stored).unwrap();
        assert!(matches!(
            Vocabulary::load_from(bytes.as_slice()),
            Err(VocabError::Corrupt(_))
        ));
    }

    fn load_stored(tokens: &[&str], unknown_id: Option<usize>) -> Result<Vocabulary, VocabError> {
        let stored = Stored {
            id_to_token: tokens.iter().map(|t| t.to_string()).collect(),
            unknown_id,
        };
        let bytes = bincode::serialize(&stored).unwrap();
        Vocabulary::load_from(bytes.as_slice())
    }

    #[test]
    fn load_rejects_unsorted_tokens() {
        assert!(matches!(
            load_stored(&["usque", "abutere"], None),
            Err(VocabError::Corrupt(_))
        ));
        // a trailing unknown token does not excuse disorder before it
        assert!(matches!(
            load_stored(&["usque", "abutere", "<unk>"], Some(2)),
            Err(VocabError::Corrupt(_))
        ));
        // nor may an unknown id inside the corpus sit out of order
        assert!(matches!(
            load_stored(&["b", "a"], Some(0)),
            Err(VocabError::Corrupt(_))
        ));
    }

    #[test]
    fn load_accepts_appended_unknown_token_in_any_position() {
        let vocab = load_stored(&["quo", "usque", "<unk>"], Some(2)).unwrap();
        assert_eq!(vocab.id("quo").unwrap(), 0);
        assert_eq!(vocab.id("cicero").unwrap(), 2);
        let vocab = load_stored(&["a", "b", "zzz"], Some(2)).unwrap();
        assert_eq!(vocab.unknown_id(), Some(2));
    }

    #[test]
    fn load_rejects_garbage() {
        let bytes = [0xffu8; 3];
        assert!(matches!(
            Vocabulary::load_from(&bytes[..]),
            Err(VocabError::Codec(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("tokenize-no-such-dir/vocab.bin");
        assert!(matches!(Vocabulary::load(path), Err(VocabError::Io(_))));
    }

    #[test]
    fn oov_policy_json_shape() {
        let p: OovPolicy = serde_json::from_str(r#"{"kind":"unknown","token":"<unk>"}"#).unwrap();
        assert_eq!(
            p,
            OovPolicy::Unknown {
                token: "<unk>".to_string()
            }
        );
    }

    proptest! {
        #[test]
        fn mapping_ignores_input_order(
            (tokens, shuffled) in proptest::collection::vec("[a-z]{1,6}", 0..40)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        ) {
            let first = Vocabulary::from_tokens(&tokens);
            let second = Vocabulary::from_tokens(&shuffled);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn ids_are_contiguous(tokens in proptest::collection::vec("[a-z]{1,4}", 1..30)) {
            let vocab = Vocabulary::from_tokens(&tokens);
            for (expected, (tok, id)) in vocab.iter().enumerate() {
                prop_assert_eq!(id, expected);
                prop_assert_eq!(vocab.id(tok).unwrap(), expected);
            }
        }
    }
}
