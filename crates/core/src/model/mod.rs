mod ids;
mod question;

pub use ids::{OptionId, ParseIdError, QuestionId};
pub use question::{AnswerOption, Question, QuestionError};
