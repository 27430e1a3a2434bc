use std::io::{stdin, stdout};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;

use so_assistant::protocol::{RankResult, ResponseErr, ResponseOk, StatsResult};
use so_assistant::retrieval::{self, CachePolicy, EmbeddingStore, RetrievalError, ThreadRanker};
use so_assistant::{config, dialogue, logging, native_messaging, ResourcePaths};

#[derive(Default)]
struct HostState {
    ranker: Option<Arc<ThreadRanker>>,
}

fn main() {
    if let Err(e) = real_main() {
        eprintln!("[so_assistant] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    logging::init_logging()?;

    log::info!("=== StackOverflow assistant host started ===");

    let mut state = HostState::default();
    let mut in_stream = stdin();
    let mut out_stream = stdout();

    let mut message_count: u64 = 0;
    loop {
        let req = match native_messaging::read_message(&mut in_stream) {
            Ok(Some(r)) => r,
            Ok(None) => {
                log::info!("No more messages after {} messages, exiting", message_count);
                break;
            }
            Err(e) => {
                log::error!("Error reading message: {:?}", e);
                break;
            }
        };

        message_count += 1;
        log::info!("Processing message #{}: {} (id: {})", message_count, req.method, req.id);

        let written = match handle_request(&mut state, &req.method, &req.params) {
            Ok(result) => native_messaging::write_message(&mut out_stream, &ResponseOk { id: req.id, result }),
            Err(e) => {
                log::error!("Handler error: {:?}", e);
                let err = ResponseErr {
                    id: req.id,
                    error: format!("{e:#}"),
                    error_kind: error_kind(&e).to_string(),
                };
                native_messaging::write_message(&mut out_stream, &err)
            }
        };
        if let Err(e) = written {
            log::error!("Error sending response: {:?}", e);
            break;
        }
    }

    log::info!("=== StackOverflow assistant host stopped ===");
    Ok(())
}

fn error_kind(e: &anyhow::Error) -> &'static str {
    e.downcast_ref::<RetrievalError>().map(RetrievalError::kind).unwrap_or("host")
}

fn handle_request(state: &mut HostState, method: &str, params: &Value) -> anyhow::Result<Value> {
    match method {
        "hello" => handle_hello(state, params),
        "init" => handle_init(state, params),
        "normalize" => handle_normalize(params),
        "vectorize" => handle_vectorize(state, params),
        "rank" => handle_rank(state, params),
        "stats" => handle_stats(state),
        "clearCache" => handle_clear_cache(state),
        _ => bail!("Unknown method: {method}"),
    }
}

fn str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn require_ranker(state: &HostState) -> anyhow::Result<&ThreadRanker> {
    state
        .ranker
        .as_deref()
        .context("Resources not loaded. Call 'init' first.")
}

fn handle_hello(state: &HostState, params: &Value) -> anyhow::Result<Value> {
    let client = str_param(params, "clientVersion").unwrap_or("unknown");
    log::info!("Hello from client {}, host version {}", client, config::HOST_VERSION);
    Ok(serde_json::json!({
        "type": "hello-response",
        "hostVersion": config::HOST_VERSION,
        "ready": state.ranker.is_some(),
        "clientVersion": client
    }))
}

fn handle_init(state: &mut HostState, params: &Value) -> anyhow::Result<Value> {
    let paths = ResourcePaths::resolve(
        str_param(params, "resourceDir"),
        str_param(params, "wordEmbeddingsPath"),
        str_param(params, "threadEmbeddingsFolder"),
    )?;
    paths.check_exist()?;

    let policy = match str_param(params, "cachePolicy") {
        Some(s) => CachePolicy::parse(s).with_context(|| format!("unknown cachePolicy: {s}"))?,
        None => CachePolicy::default(),
    };

    log::info!("Resource paths:");
    log::info!("  Word embeddings: {}", paths.word_embeddings.display());
    log::info!("  Thread embeddings: {}", paths.thread_embeddings_folder.display());

    // Re-init replaces the previous ranker (and its cache) only after the new store loaded.
    let store = Arc::new(EmbeddingStore::load(&paths.word_embeddings)?);
    let ranker = ThreadRanker::new(Arc::clone(&store), paths.thread_embeddings_folder.clone(), policy);
    state.ranker = Some(Arc::new(ranker));

    Ok(serde_json::json!({
        "ok": true,
        "vocabulary": store.len(),
        "dim": store.dim(),
        "cachePolicy": policy.as_str(),
        "wordEmbeddingsPath": paths.word_embeddings.to_string_lossy(),
        "threadEmbeddingsFolder": paths.thread_embeddings_folder.to_string_lossy()
    }))
}

fn handle_normalize(params: &Value) -> anyhow::Result<Value> {
    let text = str_param(params, "text").context("text parameter is required and must be a string")?;
    Ok(serde_json::json!({ "text": retrieval::normalize(text) }))
}

fn handle_vectorize(state: &HostState, params: &Value) -> anyhow::Result<Value> {
    let text = str_param(params, "text").context("text parameter is required and must be a string")?;
    let normalize = params.get("normalize").and_then(|v| v.as_bool()).unwrap_or(true);
    let ranker = require_ranker(state)?;

    let vector = if normalize {
        retrieval::vectorize(&retrieval::normalize(text), ranker.store())
    } else {
        retrieval::vectorize(text, ranker.store())
    };
    Ok(serde_json::json!({ "dim": vector.len(), "vector": vector }))
}

fn handle_rank(state: &HostState, params: &Value) -> anyhow::Result<Value> {
    let question = str_param(params, "question").context("question parameter is required and must be a string")?;
    let tag = str_param(params, "tag").context("tag parameter is required and must be a string")?;
    let ranker = require_ranker(state)?;

    let best = ranker.best_thread(question, tag)?;
    log::info!(
        "Best thread for tag '{}': {} (distance {:.4})",
        tag,
        best.thread_id,
        best.distance
    );

    let result = RankResult {
        url: dialogue::thread_url(&best.thread_id),
        thread_id: best.thread_id,
        distance: best.distance,
        position: best.position,
    };
    Ok(serde_json::to_value(result)?)
}

fn handle_stats(state: &HostState) -> anyhow::Result<Value> {
    let ranker = require_ranker(state)?;
    let stats = StatsResult {
        vocabulary: ranker.store().len(),
        dim: ranker.store().dim(),
        cached_tags: ranker.cached_tags(),
        cache_policy: ranker.policy().as_str().to_string(),
    };
    Ok(serde_json::to_value(stats)?)
}

fn handle_clear_cache(state: &HostState) -> anyhow::Result<Value> {
    let evicted = require_ranker(state)?.clear_cache();
    log::info!("Cleared thread index cache ({} tags)", evicted);
    Ok(serde_json::json!({ "ok": true, "evicted": evicted }))
}
