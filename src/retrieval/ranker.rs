// ranker.rs - Nearest-thread lookup for a question within one tag.
//
// question -> normalize -> sentence vector -> L2 nearest neighbor in the tag's index.
// Ties go to the lowest position, so results are stable for a fixed index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::{Result, RetrievalError};
use super::store::EmbeddingStore;
use super::text_prep::normalize;
use super::thread_index::ThreadIndex;
use super::vectorize::vectorize;

/// Whether per-tag indexes are kept after the first load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Cached,
    /// Read the tag's file on every call.
    Reload,
}

impl CachePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cached" => Some(Self::Cached),
            "reload" => Some(Self::Reload),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cached => "cached",
            Self::Reload => "reload",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedThread {
    pub thread_id: String,
    pub distance: f64,
    pub position: usize,
}

pub struct ThreadRanker {
    store: Arc<EmbeddingStore>,
    thread_folder: PathBuf,
    policy: CachePolicy,
    cache: RwLock<HashMap<String, Arc<ThreadIndex>>>,
}

impl ThreadRanker {
    pub fn new(store: Arc<EmbeddingStore>, thread_folder: impl Into<PathBuf>, policy: CachePolicy) -> Self {
        Self {
            store,
            thread_folder: thread_folder.into(),
            policy,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    pub fn thread_folder(&self) -> &Path {
        &self.thread_folder
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Id of the thread closest to `question` among threads tagged `tag`.
    pub fn rank(&self, question: &str, tag: &str) -> Result<String> {
        self.best_thread(question, tag).map(|t| t.thread_id)
    }

    pub fn best_thread(&self, question: &str, tag: &str) -> Result<RankedThread> {
        let index = self.index_for_tag(tag)?;
        let question_vec = vectorize(&normalize(question), &self.store);
        nearest(&question_vec, &index)
    }

    /// Tags currently held in the cache, sorted.
    pub fn cached_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.cache.read().keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Drop every cached index; returns how many were evicted.
    pub fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write();
        let evicted = cache.len();
        cache.clear();
        evicted
    }

    fn index_for_tag(&self, tag: &str) -> Result<Arc<ThreadIndex>> {
        if self.policy == CachePolicy::Reload {
            return ThreadIndex::load_for_tag(tag, &self.thread_folder).map(Arc::new);
        }

        if let Some(index) = self.cache.read().get(tag) {
            log::debug!("Thread index cache hit for tag '{}'", tag);
            return Ok(Arc::clone(index));
        }

        // Load outside the lock; a concurrent loader for the same tag just wins the insert.
        let loaded = Arc::new(ThreadIndex::load_for_tag(tag, &self.thread_folder)?);
        let mut cache = self.cache.write();
        let index = cache.entry(tag.to_string()).or_insert(loaded);
        Ok(Arc::clone(index))
    }
}

/// L2 nearest neighbor of `query` in `index`; lowest position wins ties.
pub fn nearest(query: &[f32], index: &ThreadIndex) -> Result<RankedThread> {
    if index.is_empty() {
        return Err(RetrievalError::EmptyIndex {
            tag: index.tag().to_string(),
        });
    }
    if index.dim() != query.len() {
        return Err(RetrievalError::DimensionMismatch {
            expected: query.len(),
            got: index.dim(),
        });
    }

    let mut best_pos = 0usize;
    let mut best_sq = f64::INFINITY;
    for (pos, v) in index.vectors().iter().enumerate() {
        let mut sq = squared_distance(query, v);
        if sq.is_nan() {
            sq = f64::INFINITY;
        }
        if sq < best_sq {
            best_sq = sq;
            best_pos = pos;
        }
    }

    Ok(RankedThread {
        thread_id: index.thread_ids()[best_pos].clone(),
        distance: best_sq.sqrt(),
        position: best_pos,
    })
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}
