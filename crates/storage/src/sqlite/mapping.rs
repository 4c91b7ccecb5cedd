use fianca_core::model::{AnswerOption, OptionId, Question, QuestionId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn option_id_from_i64(v: i64) -> Result<OptionId, StorageError> {
    Ok(OptionId::new(i64_to_u64("option_id", v)?))
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    u64_to_i64("question_id", id.value())
}

pub(crate) fn option_id_to_i64(id: OptionId) -> Result<i64, StorageError> {
    u64_to_i64("option_id", id.value())
}

/// Questions under construction while folding joined rows.
struct PendingQuestion {
    id: QuestionId,
    text: String,
    options: Vec<AnswerOption>,
}

impl PendingQuestion {
    fn finish(self) -> Result<Question, StorageError> {
        let id = self.id;
        Question::new(self.id, self.text, self.options)
            .map_err(|e| StorageError::Serialization(format!("question {id}: {e}")))
    }
}

/// Folds rows of `questions LEFT JOIN answer_options`, ordered by question id
/// then option id, into validated questions.
///
/// Expected columns: `q_id`, `q_text`, `o_id`, `o_text`, `o_correct`.
pub(crate) fn questions_from_rows(rows: &[SqliteRow]) -> Result<Vec<Question>, StorageError> {
    let mut questions = Vec::new();
    let mut pending: Option<PendingQuestion> = None;

    for row in rows {
        let qid = question_id_from_i64(row.try_get::<i64, _>("q_id").map_err(ser)?)?;

        let starts_new = pending.as_ref().is_none_or(|p| p.id != qid);
        if starts_new {
            if let Some(done) = pending.take() {
                questions.push(done.finish()?);
            }
            pending = Some(PendingQuestion {
                id: qid,
                text: row.try_get::<String, _>("q_text").map_err(ser)?,
                options: Vec::new(),
            });
        }

        let Some(oid) = row.try_get::<Option<i64>, _>("o_id").map_err(ser)? else {
            continue;
        };
        let option = AnswerOption::new(
            option_id_from_i64(oid)?,
            row.try_get::<String, _>("o_text").map_err(ser)?,
            row.try_get::<i64, _>("o_correct").map_err(ser)? != 0,
        );
        if let Some(current) = pending.as_mut() {
            current.options.push(option);
        }
    }

    if let Some(done) = pending {
        questions.push(done.finish()?);
    }
    Ok(questions)
}
