use std::sync::Arc;

use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::question_bank_service::QuestionBankService;
use crate::quiz::QuizEngine;

/// Composition root: owns storage for the lifetime of the process.
///
/// Build it once at startup and `close` it at shutdown.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    question_bank: Arc<QuestionBankService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage))
    }

    /// Build services on a fresh in-memory question bank.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(Storage::in_memory())
    }

    #[must_use]
    pub fn from_storage(storage: Storage) -> Self {
        let question_bank = Arc::new(QuestionBankService::new(Arc::clone(&storage.questions)));
        Self {
            storage,
            question_bank,
        }
    }

    #[must_use]
    pub fn question_bank(&self) -> Arc<QuestionBankService> {
        Arc::clone(&self.question_bank)
    }

    /// A new quiz session in the loading state.
    #[must_use]
    pub fn new_quiz_engine(&self) -> Arc<QuizEngine> {
        Arc::new(QuizEngine::new(self.question_bank.as_ref().clone()))
    }

    /// Release storage. Engines created from these services must not load afterwards.
    pub async fn close(&self) {
        self.storage.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn engines_share_one_question_bank() {
        let services = AppServices::in_memory();
        let first = services.new_quiz_engine();
        first.load().await;

        assert_eq!(services.question_bank().count().await.unwrap(), 5);

        let second = services.new_quiz_engine();
        assert!(second.snapshot().is_loading());
        second.load().await;
        assert_eq!(second.snapshot().questions(), first.snapshot().questions());
        services.close().await;
    }
}
