mod engine;
mod view;

pub use engine::QuizEngine;
pub use view::{
    ErrorDialog, LOADING_CAPTION, OptionItem, QuizView, REWARD_BODY, REWARD_HEADLINE,
    REWARD_SUBTITLE,
};
