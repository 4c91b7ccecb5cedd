use std::sync::Arc;

use fianca_core::catalog::default_questions;
use fianca_core::model::Question;
use storage::repository::QuestionBank;

use crate::error::QuestionBankError;

/// App-facing access to the question bank.
#[derive(Clone)]
pub struct QuestionBankService {
    bank: Arc<dyn QuestionBank>,
}

impl QuestionBankService {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        Self { bank }
    }

    /// Seed the default questions when the bank is empty.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` if the bank cannot be read or written.
    pub async fn ensure_seeded(&self) -> Result<bool, QuestionBankError> {
        let seeded = self.bank.ensure_seeded().await?;
        if seeded {
            log::debug!("question bank was empty, default set inserted");
        }
        Ok(seeded)
    }

    /// Load every question for a quiz session.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Empty` if the bank holds no questions, or
    /// `QuestionBankError::Storage` for storage failures.
    pub async fn load_all(&self) -> Result<Vec<Question>, QuestionBankError> {
        let questions = self.bank.load_all().await?;
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        Ok(questions)
    }

    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` if the bank cannot be read.
    pub async fn count(&self) -> Result<u64, QuestionBankError> {
        Ok(self.bank.count_questions().await?)
    }

    /// Wipe the bank and store the default questions again.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` if the bank cannot be written.
    pub async fn reseed(&self) -> Result<u64, QuestionBankError> {
        self.bank.clear().await?;
        let questions = default_questions();
        self.bank.insert_questions(&questions).await?;
        log::info!("question bank reseeded with {} questions", questions.len());
        Ok(questions.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fianca_core::model::{AnswerOption, OptionId, QuestionId};
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn load_all_on_empty_bank_is_an_error() {
        let service = QuestionBankService::new(Arc::new(InMemoryRepository::new()));
        let err = service.load_all().await.unwrap_err();
        assert!(matches!(err, QuestionBankError::Empty));
    }

    #[tokio::test]
    async fn reseed_replaces_custom_questions() {
        let repo = InMemoryRepository::new();
        let custom = Question::new(
            QuestionId::new(42),
            "custom",
            vec![AnswerOption::new(OptionId::new(1), "only", true)],
        )
        .unwrap();
        repo.insert_questions(&[custom]).await.unwrap();

        let service = QuestionBankService::new(Arc::new(repo));
        assert_eq!(service.reseed().await.unwrap(), 5);
        assert_eq!(service.load_all().await.unwrap(), default_questions());
    }

    #[tokio::test]
    async fn ensure_seeded_reports_first_call_only() {
        let service = QuestionBankService::new(Arc::new(InMemoryRepository::new()));
        assert!(service.ensure_seeded().await.unwrap());
        assert!(!service.ensure_seeded().await.unwrap());
        assert_eq!(service.count().await.unwrap(), 5);
    }
}
