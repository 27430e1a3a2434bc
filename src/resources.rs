use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::config;

/// Locations of the read-only resources the ranker needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub word_embeddings: PathBuf,
    pub thread_embeddings_folder: PathBuf,
}

impl ResourcePaths {
    /// Default layout inside one resource directory:
    /// `<dir>/word_embeddings.tsv` and `<dir>/thread_embeddings_by_tags/`.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            word_embeddings: dir.join(config::resources::WORD_EMBEDDINGS_FILE),
            thread_embeddings_folder: dir.join(config::resources::THREAD_EMBEDDINGS_FOLDER),
        }
    }

    /// Resolve paths from an optional resource directory, optional per-file overrides,
    /// and finally the `SO_ASSISTANT_RESOURCES` environment variable.
    pub fn resolve(
        resource_dir: Option<&str>,
        word_embeddings: Option<&str>,
        thread_folder: Option<&str>,
    ) -> anyhow::Result<Self> {
        let base = match resource_dir {
            Some(dir) => Some(PathBuf::from(dir)),
            None => std::env::var(config::resources::RESOURCE_DIR_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        };

        match (base, word_embeddings, thread_folder) {
            (_, Some(w), Some(t)) => Ok(Self {
                word_embeddings: PathBuf::from(w),
                thread_embeddings_folder: PathBuf::from(t),
            }),
            (Some(base), w, t) => {
                let mut paths = Self::from_dir(&base);
                if let Some(w) = w {
                    paths.word_embeddings = PathBuf::from(w);
                }
                if let Some(t) = t {
                    paths.thread_embeddings_folder = PathBuf::from(t);
                }
                Ok(paths)
            }
            (None, _, _) => bail!(
                "no resource directory: pass resourceDir (or both wordEmbeddingsPath and threadEmbeddingsFolder) or set {}",
                config::resources::RESOURCE_DIR_ENV
            ),
        }
    }

    /// Fail early with a readable message instead of a parse error deep in a loader.
    pub fn check_exist(&self) -> anyhow::Result<()> {
        if !self.word_embeddings.is_file() {
            bail!("word embeddings file not found: {}", self.word_embeddings.display());
        }
        if !self.thread_embeddings_folder.is_dir() {
            bail!(
                "thread embeddings folder not found: {}",
                self.thread_embeddings_folder.display()
            );
        }
        Ok(())
    }
}

pub fn home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(v) = std::env::var("HOME") {
        if !v.is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    // Windows fallback
    std::env::var("USERPROFILE")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .context("neither HOME nor USERPROFILE is set")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_uses_default_names() {
        let paths = ResourcePaths::from_dir(Path::new("/data/bot"));
        assert_eq!(paths.word_embeddings, PathBuf::from("/data/bot/word_embeddings.tsv"));
        assert_eq!(
            paths.thread_embeddings_folder,
            PathBuf::from("/data/bot/thread_embeddings_by_tags")
        );
    }

    #[test]
    fn test_resolve_overrides_single_file() {
        let paths = ResourcePaths::resolve(Some("/data/bot"), Some("/tmp/emb.tsv"), None).unwrap();
        assert_eq!(paths.word_embeddings, PathBuf::from("/tmp/emb.tsv"));
        assert_eq!(
            paths.thread_embeddings_folder,
            PathBuf::from("/data/bot/thread_embeddings_by_tags")
        );
    }

    #[test]
    fn test_resolve_explicit_pair_needs_no_dir() {
        let paths = ResourcePaths::resolve(None, Some("a.tsv"), Some("threads")).unwrap();
        assert_eq!(paths.word_embeddings, PathBuf::from("a.tsv"));
        assert_eq!(paths.thread_embeddings_folder, PathBuf::from("threads"));
    }

    #[test]
    fn test_check_exist_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResourcePaths::from_dir(dir.path()).check_exist().unwrap_err();
        assert!(err.to_string().contains("word embeddings file not found"));
    }
}
