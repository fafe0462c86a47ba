//! Postgres implementation of the EmailRepository trait

use async_trait::async_trait;
use sqlx::query;
use uuid::Uuid;

use crate::{
    domain::communication::{
        emails::{EmailRepository, NewEmailRecord},
        errors::SaveEmailError,
    },
    infrastructure::db::postgres::PostgresDatabase,
};

#[async_trait]
impl EmailRepository for PostgresDatabase {
    #[mutants::skip]
    async fn create_email(&self, email: &NewEmailRecord) -> Result<Uuid, SaveEmailError> {
        let id = Uuid::now_v7();

        query(
            r#"
            INSERT INTO emails (
                id, sender, recipient, cc, subject, email_text, status, created_by, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(id)
        .bind(&email.sender)
        .bind(&email.recipient)
        .bind(&email.cc)
        .bind(&email.subject)
        .bind(&email.email_text)
        .bind(email.status.as_str())
        .bind(email.user_id)
        .execute(&self.pool)
        .await
        .map_err(|err| SaveEmailError::from(err).for_user(email.user_id))?;

        Ok(id)
    }
}
