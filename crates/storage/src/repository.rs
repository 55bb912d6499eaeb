use async_trait::async_trait;
use learn_core::model::{ProgressError, ProgressState, Theme, TopicId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Storage key the progress record lives under.
pub const PROGRESS_KEY: &str = "learning-progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of learning progress.
///
/// Serialized as `{ "currentStep": n, "completedModules": [..], "theme": "dark" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub current_step: u32,
    #[serde(default)]
    pub completed_modules: Vec<TopicId>,
    #[serde(default)]
    pub theme: Theme,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_state(state: &ProgressState) -> Self {
        Self {
            current_step: state.current_step(),
            completed_modules: state.completed_modules().iter().cloned().collect(),
            theme: state.theme(),
        }
    }

    /// Convert the record back into domain state.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the stored step is out of range.
    pub fn into_state(self) -> Result<ProgressState, ProgressError> {
        ProgressState::from_persisted(self.current_step, self.completed_modules, self.theme)
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed documents or invalid topic ids.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Repository contract for the single progress record.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the persisted record, if one was ever written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or the record is malformed.
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError>;

    /// Replace the persisted record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<Option<ProgressRecord>>>,
    saves: Arc<AtomicUsize>,
    fail_writes: bool,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose writes always fail, like a full or missing disk.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a record as if a previous session had written it.
    #[must_use]
    pub fn with_record(record: ProgressRecord) -> Self {
        Self {
            progress: Arc::new(Mutex::new(Some(record))),
            ..Self::default()
        }
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Connection("storage unavailable".into()));
        }
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str) -> TopicId {
        TopicId::new(id).unwrap()
    }

    #[test]
    fn record_uses_camel_case_layout() {
        let record = ProgressRecord {
            current_step: 3,
            completed_modules: vec![topic("ownership")],
            theme: Theme::Light,
        };
        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currentStep": 3,
                "completedModules": ["ownership"],
                "theme": "light"
            })
        );
    }

    #[test]
    fn record_with_missing_fields_uses_defaults() {
        let record = ProgressRecord::from_json(r#"{"currentStep": 2}"#).unwrap();
        assert_eq!(record.theme, Theme::Dark);
        assert!(record.completed_modules.is_empty());
    }

    #[test]
    fn record_with_bad_topic_id_is_rejected() {
        let err = ProgressRecord::from_json(
            r#"{"currentStep": 2, "completedModules": ["Not An Id"], "theme": "dark"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn duplicate_completions_collapse_in_state() {
        let record = ProgressRecord {
            current_step: 1,
            completed_modules: vec![topic("a"), topic("a")],
            theme: Theme::Dark,
        };
        let state = record.into_state().unwrap();
        assert_eq!(state.completed_modules().len(), 1);
    }

    #[tokio::test]
    async fn in_memory_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress().await.unwrap().is_none());

        let mut state = ProgressState::default();
        state.set_current_step(4);
        state.complete_module(topic("borrowing"));
        repo.save_progress(&ProgressRecord::from_state(&state))
            .await
            .unwrap();

        let loaded = repo.load_progress().await.unwrap().unwrap();
        assert_eq!(loaded.into_state().unwrap(), state);
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn failing_repository_rejects_writes() {
        let repo = InMemoryRepository::failing();
        let record = ProgressRecord::from_state(&ProgressState::default());
        assert!(repo.save_progress(&record).await.is_err());
        assert!(repo.load_progress().await.unwrap().is_none());
        assert_eq!(repo.save_count(), 0);
    }
}
