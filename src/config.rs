// IMPORTANT:
// Keep ALL constants centralized here (no file names or sizes scattered around).

// NOTE: HOST_VERSION must stay in sync with the `version` field in Cargo.toml.
pub const HOST_VERSION: &str = "0.3.0";

pub mod logging {
    pub const LOG_DIR_REL: &str = ".so_assistant/logs";
    pub const LOG_FILE_NAME: &str = "so_assistant.log";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod native_messaging {
    // Requests are small (a question and a tag); anything bigger is a framing bug.
    pub const MAX_MESSAGE_SIZE_BYTES: u32 = 16 * 1024 * 1024;
}

pub mod resources {
    pub const WORD_EMBEDDINGS_FILE: &str = "word_embeddings.tsv";
    pub const THREAD_EMBEDDINGS_FOLDER: &str = "thread_embeddings_by_tags";

    // Per-tag thread index lives at <THREAD_EMBEDDINGS_FOLDER>/<tag>.<THREAD_INDEX_EXT>
    pub const THREAD_INDEX_EXT: &str = "json";

    // Fallback resource directory when `init` does not name one.
    pub const RESOURCE_DIR_ENV: &str = "SO_ASSISTANT_RESOURCES";
}

pub mod answer {
    pub const THREAD_URL_BASE: &str = "https://stackoverflow.com/questions";
}
