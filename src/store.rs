use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Usage bookkeeping kept outside the pipeline: a visit counter and a
/// first-visit flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageState {
    pub visit_count: u64,
    pub first_visit_seen: bool,
}

/// Injected persistence collaborator for usage state. The core pipeline
/// never reads or writes ambient storage; only the caller touches this.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Current visit count
    async fn visit_count(&self) -> AppResult<u64>;

    /// Increment the visit count and return the new value
    async fn record_visit(&self) -> AppResult<u64>;

    /// Whether the first-visit notice was already shown
    async fn first_visit_seen(&self) -> AppResult<bool>;

    /// Remember that the first-visit notice was shown
    async fn mark_first_visit_seen(&self) -> AppResult<()>;
}

/// In-memory store, used in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<UsageState>,
}

#[async_trait]
impl UsageStore for MemoryStore {
    async fn visit_count(&self) -> AppResult<u64> {
        Ok(self.state.read().await.visit_count)
    }

    async fn record_visit(&self) -> AppResult<u64> {
        let mut state = self.state.write().await;
        state.visit_count += 1;
        Ok(state.visit_count)
    }

    async fn first_visit_seen(&self) -> AppResult<bool> {
        Ok(self.state.read().await.first_visit_seen)
    }

    async fn mark_first_visit_seen(&self) -> AppResult<()> {
        self.state.write().await.first_visit_seen = true;
        Ok(())
    }
}

/// TOML-file-backed store used by the CLI
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<UsageState>,
}

impl FileStore {
    /// Open a store at the given path; a missing or unreadable file starts
    /// from the default state
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(_) => UsageState::default(),
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn persist(&self, state: &UsageState) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, toml::to_string(state)?)?;
        Ok(())
    }
}

#[async_trait]
impl UsageStore for FileStore {
    async fn visit_count(&self) -> AppResult<u64> {
        Ok(self.state.read().await.visit_count)
    }

    async fn record_visit(&self) -> AppResult<u64> {
        let mut state = self.state.write().await;
        state.visit_count += 1;
        self.persist(&state)?;
        Ok(state.visit_count)
    }

    async fn first_visit_seen(&self) -> AppResult<bool> {
        Ok(self.state.read().await.first_visit_seen)
    }

    async fn mark_first_visit_seen(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.first_visit_seen = true;
        self.persist(&state)?;
        Ok(())
    }
}
