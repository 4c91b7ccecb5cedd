use async_trait::async_trait;
use fianca_core::catalog::default_questions;
use fianca_core::model::{Question, QuestionId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the question bank.
///
/// Each operation is atomic against the backing store. Callers run them in
/// sequence; implementations need no extra coordination between calls.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Number of stored questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn count_questions(&self) -> Result<u64, StorageError>;

    /// Insert or replace questions together with their options.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be stored.
    async fn insert_questions(&self, questions: &[Question]) -> Result<(), StorageError>;

    /// All questions ordered by id, each with options ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if stored rows do not form valid
    /// questions, or other storage errors.
    async fn load_all(&self) -> Result<Vec<Question>, StorageError>;

    /// Remove every question and option.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Store the default question set if the bank is empty.
    ///
    /// Returns `true` when the default set was inserted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    async fn ensure_seeded(&self) -> Result<bool, StorageError> {
        if self.count_questions().await? > 0 {
            return Ok(false);
        }
        self.insert_questions(&default_questions()).await?;
        Ok(true)
    }

    /// Release backend resources. The bank must not be used afterwards.
    async fn close(&self) {}
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<QuestionId, Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

#[async_trait]
impl QuestionBank for InMemoryRepository {
    async fn count_questions(&self) -> Result<u64, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }

    async fn insert_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for question in questions {
            guard.insert(question.id(), question.clone());
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Owns the question bank behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionBank>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let questions: Arc<dyn QuestionBank> = Arc::new(InMemoryRepository::new());
        Self { questions }
    }

    /// Close the underlying backend.
    pub async fn close(&self) {
        self.questions.close().await;
    }
}
