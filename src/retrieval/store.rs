// store.rs - Pretrained word embeddings loaded once from a TSV file.
//
// Format: one token per line, `token<TAB>v1<TAB>v2...`, UTF-8.
// The dimension is taken from the first row; every later row must match it.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::{Result, RetrievalError};

/// Read-only token → vector lookup with a single shared dimension.
#[derive(Debug)]
pub struct EmbeddingStore {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl EmbeddingStore {
    /// Load embeddings from a tab-separated file.
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading word embeddings from {}", path.display());

        let file = File::open(path).map_err(|e| RetrievalError::load(path, e.to_string()))?;
        let reader = BufReader::new(file);

        let mut vectors: HashMap<String, Vec<f32>> = HashMap::new();
        let mut dim: Option<usize> = None;
        let mut duplicates = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| RetrievalError::load(path, format!("line {line_no}: {e}")))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (token, vector) =
                parse_row(line).map_err(|reason| RetrievalError::load(path, format!("line {line_no}: {reason}")))?;

            match dim {
                None => dim = Some(vector.len()),
                Some(d) if d != vector.len() => {
                    return Err(RetrievalError::load(
                        path,
                        format!("line {line_no}: expected {d} components, got {}", vector.len()),
                    ));
                }
                Some(_) => {}
            }

            if vectors.insert(token.to_string(), vector).is_some() {
                duplicates += 1;
            }
        }

        let Some(dim) = dim else {
            return Err(RetrievalError::load(path, "no embeddings found"));
        };

        if duplicates > 0 {
            log::warn!("{} duplicate tokens in {} (later rows win)", duplicates, path.display());
        }
        log::info!("Word embeddings loaded: {} tokens, dims={}", vectors.len(), dim);

        Ok(Self { vectors, dim })
    }

    /// Build a store from in-memory pairs, with the same validation as [`EmbeddingStore::load`].
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut vectors: HashMap<String, Vec<f32>> = HashMap::new();
        let mut dim: Option<usize> = None;

        for (token, vector) in entries {
            let token: String = token.into();
            if vector.is_empty() {
                return Err(RetrievalError::load(
                    "<memory>",
                    format!("token {token:?} has no vector components"),
                ));
            }
            match dim {
                None => dim = Some(vector.len()),
                Some(d) if d != vector.len() => {
                    return Err(RetrievalError::DimensionMismatch { expected: d, got: vector.len() });
                }
                Some(_) => {}
            }
            vectors.insert(token, vector);
        }

        let Some(dim) = dim else {
            return Err(RetrievalError::load("<memory>", "no embeddings found"));
        };
        Ok(Self { vectors, dim })
    }

    pub fn lookup(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn parse_row(line: &str) -> std::result::Result<(&str, Vec<f32>), String> {
    let mut fields = line.split('\t');
    let token = fields.next().unwrap_or_default();

    let vector = fields
        .map(|f| {
            f.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid component {f:?} for token {token:?}: {e}"))
        })
        .collect::<std::result::Result<Vec<f32>, String>>()?;

    if vector.is_empty() {
        return Err(format!("token {token:?} has no vector components"));
    }
    Ok((token, vector))
}
