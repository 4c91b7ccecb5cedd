use fianca_core::catalog::default_questions;
use fianca_core::model::Question;
use sqlx::{Sqlite, Transaction};

use super::SqliteRepository;
use super::mapping::{option_id_to_i64, question_id_to_i64, questions_from_rows};
use crate::repository::{QuestionBank, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

async fn count_in(tx: &mut Transaction<'_, Sqlite>) -> Result<u64, StorageError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(&mut **tx)
        .await
        .map_err(conn)?;
    u64::try_from(count).map_err(|_| StorageError::Serialization("negative count".into()))
}

async fn insert_in(
    tx: &mut Transaction<'_, Sqlite>,
    questions: &[Question],
) -> Result<(), StorageError> {
    for question in questions {
        let question_id = question_id_to_i64(question.id())?;

        sqlx::query(
            r"
            INSERT INTO questions (id, text)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET text = excluded.text
            ",
        )
        .bind(question_id)
        .bind(question.text())
        .execute(&mut **tx)
        .await
        .map_err(conn)?;

        // Replace the option set so options dropped from the question disappear too.
        sqlx::query("DELETE FROM answer_options WHERE question_id = ?1")
            .bind(question_id)
            .execute(&mut **tx)
            .await
            .map_err(conn)?;

        for option in question.options() {
            sqlx::query(
                r"
                INSERT INTO answer_options (id, question_id, text, is_correct)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(option_id_to_i64(option.id())?)
            .bind(question_id)
            .bind(option.text())
            .bind(i64::from(option.is_correct()))
            .execute(&mut **tx)
            .await
            .map_err(conn)?;
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl QuestionBank for SqliteRepository {
    async fn count_questions(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        u64::try_from(count).map_err(|_| StorageError::Serialization("negative count".into()))
    }

    async fn insert_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        insert_in(&mut tx, questions).await?;
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT q.id AS q_id, q.text AS q_text,
                   o.id AS o_id, o.text AS o_text, o.is_correct AS o_correct
            FROM questions q
            LEFT JOIN answer_options o ON o.question_id = q.id
            ORDER BY q.id ASC, o.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let questions = questions_from_rows(&rows)?;
        log::debug!("loaded {} questions", questions.len());
        Ok(questions)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        sqlx::query("DELETE FROM answer_options")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        sqlx::query("DELETE FROM questions")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn ensure_seeded(&self) -> Result<bool, StorageError> {
        // Write lock from the start; a second seeder waits on busy_timeout.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(conn)?;
        if count_in(&mut tx).await? > 0 {
            tx.commit().await.map_err(conn)?;
            return Ok(false);
        }
        insert_in(&mut tx, &default_questions()).await?;
        tx.commit().await.map_err(conn)?;
        log::debug!("seeded question bank with default set");
        Ok(true)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
