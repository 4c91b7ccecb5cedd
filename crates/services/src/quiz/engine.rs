use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use fianca_core::catalog::default_questions;
use fianca_core::model::{OptionId, Question};
use fianca_core::{AnswerOutcome, QuizState};
use futures_util::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::view::QuizView;
use crate::error::QuestionBankError;
use crate::question_bank_service::QuestionBankService;

/// Drives one quiz session.
///
/// State lives in a `watch` channel: every mutation notifies subscribers, and
/// `snapshot`/`view` read the latest value. All mutations are expected to come
/// from the task that owns the session.
pub struct QuizEngine {
    bank: QuestionBankService,
    state: watch::Sender<QuizState>,
}

impl QuizEngine {
    /// Create an engine in the loading state. Call `load` (or `spawn_load`)
    /// to fetch questions.
    #[must_use]
    pub fn new(bank: QuestionBankService) -> Self {
        let (state, _) = watch::channel(QuizState::loading());
        Self { bank, state }
    }

    /// Receive a notification on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn view(&self) -> QuizView {
        QuizView::from_state(&self.state.borrow())
    }

    /// Seed the bank if needed and load its questions.
    ///
    /// Any failure falls back to the built-in question set; the session always
    /// ends up playable and never loading. A panicking bank counts as a
    /// failure, and dropping this future midway also installs the fallback.
    pub async fn load(&self) {
        self.state.send_modify(|state| *state = QuizState::loading());
        let guard = LoadingGuard::new(&self.state);

        let questions = match AssertUnwindSafe(self.fetch_questions())
            .catch_unwind()
            .await
        {
            Ok(Ok(questions)) => questions,
            Ok(Err(err)) => {
                log::warn!("question bank unavailable, using built-in questions: {err}");
                default_questions()
            }
            Err(_) => {
                log::error!("question bank panicked while loading, using built-in questions");
                default_questions()
            }
        };

        guard.finish(questions);
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        self.bank.ensure_seeded().await?;
        self.bank.load_all().await
    }

    /// Run `load` on the current tokio runtime.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.load().await })
    }

    /// Answer the current question.
    ///
    /// `on_complete` runs when the last question is answered correctly and
    /// `on_fail` when a second consecutive wrong answer restarts the quiz.
    /// Both run before this returns; neither is kept.
    pub fn submit_answer(
        &self,
        option_id: OptionId,
        on_complete: impl FnOnce(),
        on_fail: impl FnOnce(),
    ) -> AnswerOutcome {
        let mut outcome = AnswerOutcome::Ignored;
        self.state.send_if_modified(|state| {
            outcome = state.submit_answer(option_id);
            outcome != AnswerOutcome::Ignored
        });

        match outcome {
            AnswerOutcome::Completed => on_complete(),
            AnswerOutcome::Restarted => on_fail(),
            AnswerOutcome::Ignored => {
                log::warn!("answer {option_id} ignored: no question is being asked");
            }
            AnswerOutcome::Advanced { .. } | AnswerOutcome::TryAgain { .. } => {}
        }
        outcome
    }

    pub fn dismiss_error(&self) {
        self.state.send_modify(QuizState::dismiss_error);
    }

    /// Restart from the first question, e.g. when the quiz is entered again.
    pub fn reset(&self) {
        self.state.send_modify(QuizState::reset);
    }
}

/// Leaves the session out of `Loading` however `load` ends.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<QuizState>,
    finished: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<QuizState>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, questions: Vec<Question>) {
        log::debug!("quiz ready with {} questions", questions.len());
        self.state.send_modify(|state| state.finish_loading(questions));
        self.finished = true;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!("question loading interrupted, using built-in questions");
        self.state
            .send_modify(|state| state.finish_loading(default_questions()));
    }
}
