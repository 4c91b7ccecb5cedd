use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    id: OptionId,
    text: String,
    is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A quiz question with its options ordered by `OptionId`.
///
/// Always holds exactly one correct option; `Question::new` is the only way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<AnswerOption>,
}

impl Question {
    /// Build a question, sorting its options by id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, there are no options,
    /// an option id repeats, an option text is blank, or the number of correct
    /// options is not exactly one.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        mut options: Vec<AnswerOption>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = BTreeSet::new();
        for option in &options {
            if !seen.insert(option.id) {
                return Err(QuestionError::DuplicateOption(option.id));
            }
            if option.text.trim().is_empty() {
                return Err(QuestionError::EmptyOptionText(option.id));
            }
        }

        match options.iter().filter(|o| o.is_correct).count() {
            0 => return Err(QuestionError::NoCorrectOption),
            1 => {}
            count => return Err(QuestionError::MultipleCorrectOptions { count }),
        }

        options.sort_by_key(AnswerOption::id);
        Ok(Self { id, text, options })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Look up an option of this question by id.
    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// The single correct option.
    #[must_use]
    pub fn correct_option(&self) -> &AnswerOption {
        // `new` rejects questions without exactly one correct option.
        self.options
            .iter()
            .find(|o| o.is_correct)
            .unwrap_or(&self.options[0])
    }

    /// Returns true if `id` names the correct option of this question.
    #[must_use]
    pub fn is_correct(&self, id: OptionId) -> bool {
        self.option(id).is_some_and(AnswerOption::is_correct)
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question has no options")]
    NoOptions,

    #[error("duplicate option id: {0}")]
    DuplicateOption(OptionId),

    #[error("option {0} has empty text")]
    EmptyOptionText(OptionId),

    #[error("question has no correct option")]
    NoCorrectOption,

    #[error("question has {count} correct options, expected exactly one")]
    MultipleCorrectOptions { count: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(id: u64, correct: bool) -> AnswerOption {
        AnswerOption::new(OptionId::new(id), format!("option {id}"), correct)
    }

    #[test]
    fn options_are_sorted_by_id() {
        let q = Question::new(
            QuestionId::new(1),
            "Q",
            vec![opt(103, false), opt(101, true), opt(102, false)],
        )
        .unwrap();

        let ids: Vec<u64> = q.options().iter().map(|o| o.id().value()).collect();
        assert_eq!(ids, vec![101, 102, 103]);
        assert_eq!(q.correct_option().id(), OptionId::new(101));
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(QuestionId::new(1), "  ", vec![opt(1, true)]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn rejects_missing_options() {
        let err = Question::new(QuestionId::new(1), "Q", Vec::new()).unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let err = Question::new(QuestionId::new(1), "Q", vec![opt(7, true), opt(7, false)])
            .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption(OptionId::new(7)));
    }

    #[test]
    fn rejects_blank_option_text() {
        let blank = AnswerOption::new(OptionId::new(2), " ", false);
        let err = Question::new(QuestionId::new(1), "Q", vec![opt(1, true), blank]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOptionText(OptionId::new(2)));
    }

    #[test]
    fn requires_exactly_one_correct_option() {
        let none = Question::new(QuestionId::new(1), "Q", vec![opt(1, false), opt(2, false)]);
        assert_eq!(none.unwrap_err(), QuestionError::NoCorrectOption);

        let many = Question::new(QuestionId::new(1), "Q", vec![opt(1, true), opt(2, true)]);
        assert_eq!(
            many.unwrap_err(),
            QuestionError::MultipleCorrectOptions { count: 2 }
        );
    }

    #[test]
    fn unknown_option_is_not_correct() {
        let q = Question::new(QuestionId::new(1), "Q", vec![opt(1, true), opt(2, false)]).unwrap();
        assert!(q.is_correct(OptionId::new(1)));
        assert!(!q.is_correct(OptionId::new(2)));
        assert!(!q.is_correct(OptionId::new(99)));
        assert!(q.option(OptionId::new(99)).is_none());
    }
}
