//! Quiz progression state machine.
//!
//! Pure transitions only: the caller owns loading, notification, and the
//! completion/failure callbacks. States are `Loading`, `Ready(i)`,
//! `ErrorShown(i)` and `Completed`:
//!
//! - `Loading -> Ready(0)` once questions are set,
//! - `Ready(i) -> Ready(i + 1)` on a correct answer before the last question,
//! - `Ready(i) -> Completed` on a correct answer at the last question,
//! - `Ready(i) -> ErrorShown(i)` on a first wrong answer,
//! - `Ready(i) -> ErrorShown(0)` on a second consecutive wrong answer,
//! - `ErrorShown(i) -> Ready(i)` on dismiss,
//! - any non-loading state `-> Ready(0)` on reset.

use crate::model::{OptionId, Question};

/// Consecutive wrong answers that restart the session.
pub const RESTART_STREAK: u8 = 2;

//
// ─── ERROR NOTICE ──────────────────────────────────────────────────────────────
//

/// Content of the error dialog shown after a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorNotice {
    /// First wrong answer; the player stays on the same question.
    TryAgain,
    /// Wrong-answer streak reached `RESTART_STREAK`; progress went back to the first question.
    Restart,
}

impl ErrorNotice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ErrorNotice::TryAgain => "Pensa bem...",
            ErrorNotice::Restart => "Pra um ser inteligente...enfim!... Vamos recomeçar!",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ErrorNotice::TryAgain => "Tenta de novo",
            ErrorNotice::Restart => "Idiota",
        }
    }
}

//
// ─── OUTCOMES AND PHASES ───────────────────────────────────────────────────────
//

/// Result of a single `submit_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct answer; moved on to question `index`.
    Advanced { index: usize },
    /// Correct answer on the last question.
    Completed,
    /// Wrong answer; `streak` consecutive misses so far.
    TryAgain { streak: u8 },
    /// Second consecutive wrong answer; back to the first question.
    Restarted,
    /// Submission rejected: still loading, already completed, or no current question.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Ready { index: usize },
    ErrorShown { index: usize },
    Completed,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// In-memory session state for one run of the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    questions: Vec<Question>,
    current_index: usize,
    wrong_streak: u8,
    error_visible: bool,
    error: Option<ErrorNotice>,
    loading: bool,
    completed: bool,
}

impl Default for QuizState {
    fn default() -> Self {
        Self::loading()
    }
}

impl QuizState {
    /// State of a session whose questions have not arrived yet.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            questions: Vec::new(),
            current_index: 0,
            wrong_streak: 0,
            error_visible: false,
            error: None,
            loading: true,
            completed: false,
        }
    }

    /// State of a session ready to play `questions` from the start.
    #[must_use]
    pub fn ready(questions: Vec<Question>) -> Self {
        let mut state = Self::loading();
        state.finish_loading(questions);
        state
    }

    /// Install the loaded questions and leave the loading state.
    pub fn finish_loading(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.reset();
        self.loading = false;
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn wrong_streak(&self) -> u8 {
        self.wrong_streak
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn is_error_visible(&self) -> bool {
        self.error_visible
    }

    /// The last error notice, kept after dismissal until the next reset.
    #[must_use]
    pub fn error(&self) -> Option<ErrorNotice> {
        self.error
    }

    /// Error dialog text; empty when no error has been raised since the last reset.
    #[must_use]
    pub fn error_message(&self) -> &'static str {
        self.error.map_or("", ErrorNotice::message)
    }

    /// The question being asked, if the session is playable.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.loading {
            return None;
        }
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.loading {
            QuizPhase::Loading
        } else if self.completed {
            QuizPhase::Completed
        } else if self.error_visible {
            QuizPhase::ErrorShown {
                index: self.current_index,
            }
        } else {
            QuizPhase::Ready {
                index: self.current_index,
            }
        }
    }

    /// Apply an answer to the current question.
    ///
    /// An `option_id` that does not belong to the current question counts as a
    /// wrong answer.
    pub fn submit_answer(&mut self, option_id: OptionId) -> AnswerOutcome {
        if self.completed {
            return AnswerOutcome::Ignored;
        }
        let Some(question) = self.current_question() else {
            return AnswerOutcome::Ignored;
        };

        if question.is_correct(option_id) {
            self.wrong_streak = 0;
            let last = self.questions.len() - 1;
            if self.current_index == last {
                self.completed = true;
                return AnswerOutcome::Completed;
            }
            self.current_index += 1;
            return AnswerOutcome::Advanced {
                index: self.current_index,
            };
        }

        self.wrong_streak += 1;
        self.error_visible = true;
        if self.wrong_streak >= RESTART_STREAK {
            self.error = Some(ErrorNotice::Restart);
            self.wrong_streak = 0;
            self.current_index = 0;
            AnswerOutcome::Restarted
        } else {
            self.error = Some(ErrorNotice::TryAgain);
            AnswerOutcome::TryAgain {
                streak: self.wrong_streak,
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error_visible = false;
    }

    /// Back to the first question with a clean streak and no error.
    ///
    /// Loaded questions are kept; a pending load is unaffected.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.wrong_streak = 0;
        self.error_visible = false;
        self.error = None;
        self.completed = false;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CORRECT_OPTION_IDS, default_questions};

    fn fresh() -> QuizState {
        QuizState::ready(default_questions())
    }

    fn correct(index: usize) -> OptionId {
        OptionId::new(CORRECT_OPTION_IDS[index])
    }

    fn wrong(index: usize) -> OptionId {
        OptionId::new(CORRECT_OPTION_IDS[index] + 1)
    }

    #[test]
    fn loading_state_ignores_answers() {
        let mut state = QuizState::loading();
        assert_eq!(state.phase(), QuizPhase::Loading);
        assert_eq!(state.submit_answer(correct(0)), AnswerOutcome::Ignored);
        assert_eq!(state.current_index(), 0);
        assert!(state.current_question().is_none());
    }

    #[test]
    fn empty_question_list_ignores_answers() {
        let mut state = QuizState::ready(Vec::new());
        assert_eq!(state.submit_answer(correct(0)), AnswerOutcome::Ignored);
        assert!(!state.is_error_visible());
    }

    #[test]
    fn correct_answer_advances() {
        let mut state = fresh();
        assert_eq!(
            state.submit_answer(correct(0)),
            AnswerOutcome::Advanced { index: 1 }
        );
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.wrong_streak(), 0);
        assert_eq!(state.phase(), QuizPhase::Ready { index: 1 });
    }

    #[test]
    fn correct_answer_on_last_question_completes_in_place() {
        let mut state = fresh();
        for i in 0..4 {
            state.submit_answer(correct(i));
        }
        assert_eq!(state.submit_answer(correct(4)), AnswerOutcome::Completed);
        assert_eq!(state.current_index(), 4);
        assert_eq!(state.phase(), QuizPhase::Completed);
        assert_eq!(state.submit_answer(correct(4)), AnswerOutcome::Ignored);
    }

    #[test]
    fn first_wrong_answer_shows_try_again() {
        let mut state = fresh();
        state.submit_answer(correct(0));
        assert_eq!(
            state.submit_answer(wrong(1)),
            AnswerOutcome::TryAgain { streak: 1 }
        );
        assert_eq!(state.current_index(), 1);
        assert!(state.is_error_visible());
        assert_eq!(state.error(), Some(ErrorNotice::TryAgain));
        assert_eq!(state.error_message(), "Pensa bem...");
        assert_eq!(state.phase(), QuizPhase::ErrorShown { index: 1 });
    }

    #[test]
    fn second_wrong_answer_restarts() {
        let mut state = fresh();
        state.submit_answer(correct(0));
        state.submit_answer(correct(1));
        state.submit_answer(wrong(2));
        assert_eq!(state.submit_answer(wrong(2)), AnswerOutcome::Restarted);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.wrong_streak(), 0);
        assert!(state.is_error_visible());
        assert_eq!(state.error(), Some(ErrorNotice::Restart));
        assert_eq!(state.phase(), QuizPhase::ErrorShown { index: 0 });
    }

    #[test]
    fn unknown_option_counts_as_wrong() {
        let mut state = fresh();
        assert_eq!(
            state.submit_answer(OptionId::new(9999)),
            AnswerOutcome::TryAgain { streak: 1 }
        );
    }

    #[test]
    fn correct_answer_clears_streak() {
        let mut state = fresh();
        state.submit_answer(wrong(0));
        assert_eq!(state.wrong_streak(), 1);
        state.submit_answer(correct(0));
        assert_eq!(state.wrong_streak(), 0);
        assert_eq!(
            state.submit_answer(wrong(1)),
            AnswerOutcome::TryAgain { streak: 1 }
        );
    }

    #[test]
    fn dismiss_hides_error_but_keeps_message() {
        let mut state = fresh();
        state.submit_answer(wrong(0));
        state.dismiss_error();
        assert!(!state.is_error_visible());
        assert_eq!(state.error_message(), "Pensa bem...");
        assert_eq!(state.phase(), QuizPhase::Ready { index: 0 });
    }

    #[test]
    fn reset_restores_initial_progress() {
        let mut state = fresh();
        state.submit_answer(correct(0));
        state.submit_answer(wrong(1));
        state.reset();

        assert_eq!(state.current_index(), 0);
        assert_eq!(state.wrong_streak(), 0);
        assert!(!state.is_error_visible());
        assert_eq!(state.error_message(), "");
        assert_eq!(state.questions().len(), 5);
    }

    #[test]
    fn reset_after_completion_allows_replay() {
        let mut state = fresh();
        for i in 0..5 {
            state.submit_answer(correct(i));
        }
        assert!(state.is_completed());
        state.reset();
        assert!(!state.is_completed());
        assert_eq!(
            state.submit_answer(correct(0)),
            AnswerOutcome::Advanced { index: 1 }
        );
    }

    #[test]
    fn reset_does_not_end_loading() {
        let mut state = QuizState::loading();
        state.reset();
        assert!(state.is_loading());
    }

    #[test]
    fn notice_titles() {
        assert_eq!(ErrorNotice::Restart.title(), "Idiota");
        assert_eq!(ErrorNotice::TryAgain.title(), "Tenta de novo");
    }
}
