// thread_index.rs - Precomputed thread embeddings for one tag.
//
// Stored as `<folder>/<tag>.json` holding a pair `[thread_ids, vectors]`, both in the
// same order. Ids may be strings or integers (StackOverflow post ids).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::{Result, RetrievalError};
use crate::config;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawThreadId {
    Number(u64),
    Text(String),
}

impl From<RawThreadId> for String {
    fn from(id: RawThreadId) -> Self {
        match id {
            RawThreadId::Number(n) => n.to_string(),
            RawThreadId::Text(s) => s,
        }
    }
}

/// Ordered thread ids and their vectors for a single tag.
#[derive(Debug, Clone)]
pub struct ThreadIndex {
    tag: String,
    thread_ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

impl ThreadIndex {
    /// Build an index from aligned sequences; they must have equal length and
    /// every vector must have the same dimension.
    pub fn new(tag: impl Into<String>, thread_ids: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        let tag = tag.into();
        if thread_ids.len() != vectors.len() {
            return Err(RetrievalError::load(
                format!("<{tag}>"),
                format!("{} thread ids but {} vectors", thread_ids.len(), vectors.len()),
            ));
        }

        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some((pos, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(RetrievalError::load(
                format!("<{tag}>"),
                format!("vector #{pos} has {} components, expected {dim}", v.len()),
            ));
        }

        Ok(Self {
            tag,
            thread_ids,
            vectors,
            dim,
        })
    }

    /// Load the index for `tag` from `base_folder`.
    pub fn load_for_tag(tag: &str, base_folder: &Path) -> Result<Self> {
        let path = index_path(tag, base_folder)?;
        log::debug!("Loading thread index for tag '{}' from {}", tag, path.display());

        let bytes = fs::read(&path).map_err(|e| RetrievalError::load(&path, e.to_string()))?;
        let (raw_ids, vectors): (Vec<RawThreadId>, Vec<Vec<f32>>) =
            serde_json::from_slice(&bytes).map_err(|e| RetrievalError::load(&path, e.to_string()))?;
        let thread_ids = raw_ids.into_iter().map(String::from).collect();

        let index = Self::new(tag, thread_ids, vectors).map_err(|e| match e {
            RetrievalError::Load { reason, .. } => RetrievalError::load(&path, reason),
            other => other,
        })?;

        log::info!(
            "Thread index loaded for tag '{}': {} threads, dims={}",
            tag,
            index.len(),
            index.dim
        );
        Ok(index)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn thread_ids(&self) -> &[String] {
        &self.thread_ids
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Vector dimension, 0 for an empty index.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.thread_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thread_ids.is_empty()
    }
}

/// `<base_folder>/<tag>.json`. Tags are plain names and never leave the folder.
pub fn index_path(tag: &str, base_folder: &Path) -> Result<PathBuf> {
    let file_name = format!("{tag}.{}", config::resources::THREAD_INDEX_EXT);
    if tag.is_empty() || tag == "." || tag == ".." || tag.contains(['/', '\\']) {
        return Err(RetrievalError::load(base_folder.join(file_name), "invalid tag name"));
    }
    Ok(base_folder.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_index(dir: &Path, tag: &str, json: &str) {
        fs::write(dir.join(format!("{tag}.json")), json).unwrap();
    }

    #[test]
    fn test_load_for_tag_string_and_numeric_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "python", r#"[[12345, "t2"], [[0.0, 1.0], [1.0, 0.0]]]"#);

        let index = ThreadIndex::load_for_tag("python", dir.path()).unwrap();
        assert_eq!(index.tag(), "python");
        assert_eq!(index.thread_ids(), &["12345".to_string(), "t2".to_string()]);
        assert_eq!(index.dim(), 2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_load_for_unknown_tag_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ThreadIndex::load_for_tag("haskell", dir.path()).unwrap_err();
        match err {
            RetrievalError::Load { path, .. } => assert!(path.ends_with("haskell.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_mismatched_lengths() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "c#", r#"[["a", "b"], [[0.0, 1.0]]]"#);
        let err = ThreadIndex::load_for_tag("c#", dir.path()).unwrap_err();
        assert!(err.to_string().contains("2 thread ids but 1 vectors"), "{err}");
    }

    #[test]
    fn test_load_rejects_ragged_vectors() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "java", r#"[["a", "b"], [[0.0, 1.0], [1.0]]]"#);
        let err = ThreadIndex::load_for_tag("java", dir.path()).unwrap_err();
        assert!(matches!(err, RetrievalError::Load { .. }));
        assert!(err.to_string().contains("vector #1"), "{err}");
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "r", "{not json");
        assert!(matches!(ThreadIndex::load_for_tag("r", dir.path()), Err(RetrievalError::Load { .. })));
    }

    #[test]
    fn test_load_empty_index_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "swift", "[[], []]");
        let index = ThreadIndex::load_for_tag("swift", dir.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dim(), 0);
    }

    #[test]
    fn test_index_path_rejects_traversal() {
        let base = Path::new("/srv/threads");
        assert!(index_path("../secrets", base).is_err());
        assert!(index_path("a/b", base).is_err());
        assert!(index_path("", base).is_err());
        assert_eq!(index_path("c++", base).unwrap(), PathBuf::from("/srv/threads/c++.json"));
    }
}
