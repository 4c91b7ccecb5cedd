#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod question_bank_service;
pub mod quiz;

pub use app_services::AppServices;
pub use error::{AppServicesError, QuestionBankError};
pub use question_bank_service::QuestionBankService;
pub use quiz::{QuizEngine, QuizView};
