// dialogue.rs - Routes a question either to small talk or to a StackOverflow thread.
//
// The classifiers and the chit-chat engine are pretrained, swappable collaborators;
// only their call signatures are fixed here.

use std::sync::Arc;

use anyhow::Context;

use crate::config;
use crate::retrieval::{normalize, ThreadRanker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Small talk, answered by the chit-chat engine.
    Dialogue,
    /// A programming question, answered with a thread link.
    Other,
}

/// Turns prepared text into classifier features (e.g. TF-IDF).
pub trait FeatureExtractor: Send + Sync {
    fn transform(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

pub trait IntentClassifier: Send + Sync {
    fn classify_intent(&self, features: &[f32]) -> anyhow::Result<Intent>;
}

pub trait TagClassifier: Send + Sync {
    fn classify_tag(&self, features: &[f32]) -> anyhow::Result<String>;
}

pub trait ChitChatEngine: Send + Sync {
    fn respond(&self, text: &str) -> anyhow::Result<String>;
}

pub fn thread_url(thread_id: &str) -> String {
    format!("{}/{thread_id}", config::answer::THREAD_URL_BASE)
}

pub fn format_thread_answer(tag: &str, thread_id: &str) -> String {
    format!(
        "I think this is about {tag}.\nThis thread might help you: \n{}",
        thread_url(thread_id)
    )
}

pub struct DialogueManager {
    features: Box<dyn FeatureExtractor>,
    intents: Box<dyn IntentClassifier>,
    tags: Box<dyn TagClassifier>,
    chitchat: Box<dyn ChitChatEngine>,
    ranker: Arc<ThreadRanker>,
}

impl DialogueManager {
    pub fn new(
        features: Box<dyn FeatureExtractor>,
        intents: Box<dyn IntentClassifier>,
        tags: Box<dyn TagClassifier>,
        chitchat: Box<dyn ChitChatEngine>,
        ranker: Arc<ThreadRanker>,
    ) -> Self {
        Self {
            features,
            intents,
            tags,
            chitchat,
            ranker,
        }
    }

    /// Answer a question: small talk goes to the chit-chat engine verbatim,
    /// everything else is tagged and answered with the nearest thread.
    pub fn generate_answer(&self, question: &str) -> anyhow::Result<String> {
        let prepared = normalize(question);
        let features = self
            .features
            .transform(&prepared)
            .context("feature extraction failed")?;
        let intent = self
            .intents
            .classify_intent(&features)
            .context("intent classification failed")?;
        log::debug!("Question intent: {:?}", intent);

        if intent == Intent::Dialogue {
            return self.chitchat.respond(question).context("chit-chat engine failed");
        }

        let tag = self.tags.classify_tag(&features).context("tag classification failed")?;
        let thread_id = self
            .ranker
            .rank(question, &tag)
            .with_context(|| format!("thread ranking failed for tag '{tag}'"))?;
        log::info!("Routed question to tag '{}', thread {}", tag, thread_id);

        Ok(format_thread_answer(&tag, &thread_id))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use super::*;
    use crate::retrieval::{CachePolicy, EmbeddingStore, RetrievalError};

    // Feature = word count; long questions are treated as programming questions.
    struct WordCount;
    impl FeatureExtractor for WordCount {
        fn transform(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![text.split_whitespace().count() as f32])
        }
    }

    struct ByLength;
    impl IntentClassifier for ByLength {
        fn classify_intent(&self, features: &[f32]) -> anyhow::Result<Intent> {
            Ok(if features[0] < 2.0 { Intent::Dialogue } else { Intent::Other })
        }
    }

    struct FixedTag(&'static str);
    impl TagClassifier for FixedTag {
        fn classify_tag(&self, _features: &[f32]) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct Echo {
        seen: Mutex<Vec<String>>,
    }
    impl ChitChatEngine for Arc<Echo> {
        fn respond(&self, text: &str) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(format!("echo: {text}"))
        }
    }

    fn ranker(dir: &std::path::Path) -> Arc<ThreadRanker> {
        let store = EmbeddingStore::from_entries([
            ("sort", vec![1.0, 0.0]),
            ("list", vec![1.0, 0.0]),
            ("thread", vec![0.0, 1.0]),
        ])
        .unwrap();
        fs::write(dir.join("python.json"), r#"[[101, 202], [[1, 0], [0, 1]]]"#).unwrap();
        Arc::new(ThreadRanker::new(Arc::new(store), dir, CachePolicy::Cached))
    }

    fn manager(dir: &std::path::Path, tag: &'static str, echo: Arc<Echo>) -> DialogueManager {
        DialogueManager::new(
            Box::new(WordCount),
            Box::new(ByLength),
            Box::new(FixedTag(tag)),
            Box::new(echo),
            ranker(dir),
        )
    }

    #[test]
    fn test_programming_question_gets_thread_link() {
        let dir = tempfile::tempdir().unwrap();
        let dm = manager(dir.path(), "python", Arc::new(Echo::default()));
        let answer = dm.generate_answer("How do I sort a list?").unwrap();
        assert_eq!(
            answer,
            "I think this is about python.\nThis thread might help you: \nhttps://stackoverflow.com/questions/101"
        );
    }

    #[test]
    fn test_small_talk_goes_to_chitchat_with_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let echo = Arc::new(Echo::default());
        let dm = manager(dir.path(), "python", Arc::clone(&echo));
        // "Hello there!" normalizes to a single token, so it is small talk.
        assert_eq!(dm.generate_answer("Hello there!").unwrap(), "echo: Hello there!");
        assert_eq!(echo.seen.lock().unwrap().as_slice(), &["Hello there!".to_string()]);
    }

    #[test]
    fn test_unknown_tag_surfaces_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let dm = manager(dir.path(), "fortran", Arc::new(Echo::default()));
        let err = dm.generate_answer("sort my list of threads").unwrap_err();
        assert!(err.to_string().contains("fortran"));
        assert!(matches!(
            err.downcast_ref::<RetrievalError>(),
            Some(RetrievalError::Load { .. })
        ));
    }

    #[test]
    fn test_format_thread_answer() {
        assert_eq!(thread_url("42"), "https://stackoverflow.com/questions/42");
        assert!(format_thread_answer("c++", "42").starts_with("I think this is about c++.\n"));
    }
}
