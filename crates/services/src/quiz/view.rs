use fianca_core::model::OptionId;
use fianca_core::{QuizPhase, QuizState};

/// Shown while questions are loading.
pub const LOADING_CAPTION: &str = "Seja um cavalheiro...";

pub const REWARD_HEADLINE: &str = "AUAU!";
pub const REWARD_SUBTITLE: &str = "Pelo menos não és Burro";
pub const REWARD_BODY: &str = "O Teu Prémio\n\nUma Noite Comigo\nAceitas? Responde por chamada.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub id: OptionId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: &'static str,
    pub message: &'static str,
}

/// Everything a screen needs to render the quiz at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizView {
    pub phase: QuizPhase,
    /// "Questão N de M" while a question is on screen.
    pub progress_label: Option<String>,
    pub question: Option<String>,
    pub options: Vec<OptionItem>,
    pub error: Option<ErrorDialog>,
}

impl QuizView {
    #[must_use]
    pub fn from_state(state: &QuizState) -> Self {
        let phase = state.phase();
        let question = match phase {
            QuizPhase::Ready { .. } | QuizPhase::ErrorShown { .. } => state.current_question(),
            QuizPhase::Loading | QuizPhase::Completed => None,
        };

        let error = match (state.is_error_visible(), state.error()) {
            (true, Some(notice)) => Some(ErrorDialog {
                title: notice.title(),
                message: notice.message(),
            }),
            _ => None,
        };

        Self {
            phase,
            progress_label: question.map(|_| {
                format!(
                    "Questão {} de {}",
                    state.current_index() + 1,
                    state.questions().len()
                )
            }),
            question: question.map(|q| q.text().to_owned()),
            options: question
                .map(|q| {
                    q.options()
                        .iter()
                        .map(|o| OptionItem {
                            id: o.id(),
                            text: o.text().to_owned(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            error,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == QuizPhase::Loading
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    /// Resolve a 1-based position in `options` to its option id.
    #[must_use]
    pub fn option_at(&self, choice: usize) -> Option<OptionId> {
        choice
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .map(|o| o.id)
    }
}
