//! The canonical question set.
//!
//! Used to seed an empty question bank and as the offline fallback when the
//! bank cannot be read.

use crate::model::{AnswerOption, OptionId, Question, QuestionError, QuestionId};

/// Correct option ids of `default_questions`, in question order.
pub const CORRECT_OPTION_IDS: [u64; 5] = [102, 202, 303, 403, 502];

type RawQuestion = (u64, &'static str, [(u64, &'static str, bool); 4]);

const DEFAULT_SET: [RawQuestion; 5] = [
    (
        1,
        "O que sentes quando humilhas alguém?",
        [
            (101, "Vontade de torna-los inteligentes", false),
            (102, "Dopamina", true),
            (103, "Nada", false),
            (104, "Nunca parei pra pensar nisso", false),
        ],
    ),
    (
        2,
        "Como deixar claro que és inteligete sem inferiorizar ninguém?",
        [
            (201, "Calando a boca", false),
            (202, "Falar o que penso em um tom amigavel", true),
            (
                203,
                "Faze-lo entender que está usando mal o cérebro, sem ser arrogante",
                false,
            ),
            (204, "Fingir que não sei e ficaria quieto", false),
        ],
    ),
    (
        3,
        "O que farias se encontrasses uma mulher na tua cama?",
        [
            (301, "Comia ela, ninguém lhe chamou.", false),
            (302, "Lhe manda sair imediatamente.", false),
            (303, "Siria do quarto e espersva ela na sala pra conversar.", true),
            (304, "Acharia ridículo, e riria da cara dela.", false),
        ],
    ),
    (
        4,
        "Como tratarias uma mulher que está obcecada por ti?",
        [
            (401, "Ignorava, não tenho paciência para isso", false),
            (402, "Aproveitava, eu gosto de adrenalina", false),
            (403, "Conversaria", true),
            (404, "Fugia, de louco basta eu na minha vida", false),
        ],
    ),
    (
        5,
        "Quais são os princípios que mais importam?",
        [
            (501, "Dinheiro e poder", false),
            (502, "Irmandade, honestidade e respeito", true),
            (503, "Religiosos", false),
            (504, "Ambição", false),
        ],
    ),
];

fn build(raw: &RawQuestion) -> Result<Question, QuestionError> {
    let (id, text, options) = raw;
    let options = options
        .iter()
        .map(|(oid, otext, correct)| AnswerOption::new(OptionId::new(*oid), *otext, *correct))
        .collect();
    Question::new(QuestionId::new(*id), *text, options)
}

/// Returns the 5 default questions, ordered by id, 4 options each.
#[must_use]
pub fn default_questions() -> Vec<Question> {
    DEFAULT_SET
        .iter()
        .filter_map(|raw| build(raw).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_raw_entry_is_a_valid_question() {
        for raw in &DEFAULT_SET {
            assert!(build(raw).is_ok(), "question {} is invalid", raw.0);
        }
    }

    #[test]
    fn default_set_has_five_questions_with_four_options() {
        let questions = default_questions();
        assert_eq!(questions.len(), 5);
        for q in &questions {
            assert_eq!(q.options().len(), 4);
        }
    }

    #[test]
    fn each_question_has_exactly_one_correct_option() {
        for q in default_questions() {
            let correct = q.options().iter().filter(|o| o.is_correct()).count();
            assert_eq!(correct, 1, "question {}", q.id());
        }
    }

    #[test]
    fn correct_ids_match_constant() {
        let ids: Vec<u64> = default_questions()
            .iter()
            .map(|q| q.correct_option().id().value())
            .collect();
        assert_eq!(ids, CORRECT_OPTION_IDS.to_vec());
    }

    #[test]
    fn questions_are_ordered_by_id() {
        let ids: Vec<u64> = default_questions().iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
