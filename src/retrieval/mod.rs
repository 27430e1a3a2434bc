// retrieval/ - Semantic thread retrieval over precomputed word and thread embeddings.
//
// Provides:
// - Question normalization (lowercase, punctuation and stopword removal)
// - Word embedding store loaded from TSV
// - Sentence vectors as the mean of known word vectors
// - Per-tag thread indexes and nearest-thread ranking

pub mod error;
pub mod ranker;
pub mod store;
pub mod text_prep;
pub mod thread_index;
pub mod vectorize;

pub use error::{Result, RetrievalError};
pub use ranker::{CachePolicy, RankedThread, ThreadRanker};
pub use store::EmbeddingStore;
pub use text_prep::normalize;
pub use thread_index::ThreadIndex;
pub use vectorize::vectorize;
