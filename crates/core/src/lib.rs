#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod progression;

pub use progression::{AnswerOutcome, ErrorNotice, QuizPhase, QuizState};
