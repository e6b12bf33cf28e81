#![forbid(unsafe_code)]

//! Reader for the plain-text vector layout: one `word v1 v2 ... vD` entry per
//! line, fields separated by whitespace. An optional first line `count dim`
//! is treated as a header and checked against the body.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::EmbeddingError;
use crate::source::{InMemorySource, PretrainedSource};

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let count = fields.next()?.parse().ok()?;
    let dim = fields.next()?.parse().ok()?;
    match fields.next() {
        None => Some((count, dim)),
        Some(_) => None,
    }
}

/// Parse text vectors from `reader`.
///
/// Blank lines are skipped. Rows of differing width, unparsable numbers and
/// repeated words are rejected with the offending 1-based line number.
pub fn read_text<R: BufRead>(reader: R) -> Result<InMemorySource, EmbeddingError> {
    // (line, count) of the header, if the first entry is one
    let mut header: Option<(usize, usize)> = None;
    let mut src: Option<InMemorySource> = None;
    let mut seen_first = false;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if !seen_first {
            seen_first = true;
            if let Some((count, dim)) = parse_header(&line) {
                header = Some((line_no, count));
                src = Some(InMemorySource::new(dim));
                continue;
            }
        }

        let mut fields = line.split_whitespace();
        let word = fields.next().ok_or_else(|| EmbeddingError::Parse {
            line: line_no,
            reason: "missing word".to_string(),
        })?;
        let vector = fields
            .map(|f| {
                f.parse::<f32>().map_err(|e| EmbeddingError::Parse {
                    line: line_no,
                    reason: format!("bad value {f:?}: {e}"),
                })
            })
            .collect::<Result<Vec<f32>, _>>()?;
        if vector.is_empty() {
            return Err(EmbeddingError::Parse {
                line: line_no,
                reason: format!("no values for {word:?}"),
            });
        }

        let src = src.get_or_insert_with(|| InMemorySource::new(vector.len()));
        if vector.len() != src.dim() {
            return Err(EmbeddingError::Parse {
                line: line_no,
                reason: format!("expected {} values, found {}", src.dim(), vector.len()),
            });
        }
        if src.contains(word) {
            return Err(EmbeddingError::Parse {
                line: line_no,
                reason: format!("duplicate word {word:?}"),
            });
        }
        src.insert(word, vector)?;
    }

    let src = src.unwrap_or_default();
    if let Some((line, count)) = header {
        if count != src.len() {
            return Err(EmbeddingError::Parse {
                line,
                reason: format!("header declares {count} words, body has {}", src.len()),
            });
        }
    }
    debug!(words = src.len(), dim = src.dim(), "loaded text vectors");
    Ok(src)
}

/// Parse a text vector file.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<InMemorySource, EmbeddingError> {
    read_text(BufReader::new(File::open(path)?))
}
