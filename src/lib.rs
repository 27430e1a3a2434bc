pub mod config;
pub mod dialogue;
pub mod logging;
pub mod native_messaging;
pub mod protocol;
pub mod resources;
pub mod retrieval;

pub use dialogue::{DialogueManager, Intent};
pub use resources::ResourcePaths;
pub use retrieval::{normalize, vectorize, CachePolicy, EmbeddingStore, RetrievalError, ThreadIndex, ThreadRanker};
