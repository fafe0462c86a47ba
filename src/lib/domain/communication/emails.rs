//! Audit records of sent emails

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    errors::SaveEmailError,
    mail::{Mail, MailStatus},
};

/// A row describing a single delivery attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmailRecord {
    /// Sender address
    pub sender: String,

    /// Recipients, comma separated
    pub recipient: String,

    /// Carbon copy recipients, comma separated
    pub cc: Option<String>,

    /// Subject line
    pub subject: Option<String>,

    /// Plain text body, unset for HTML emails
    pub email_text: Option<String>,

    /// Outcome of the attempt
    pub status: MailStatus,

    /// User linked as creator and updater, if any
    pub user_id: Option<i64>,
}

impl NewEmailRecord {
    /// Creates a record of `mail` with the given outcome
    pub fn new(mail: &Mail, status: MailStatus) -> Self {
        Self {
            sender: mail.from.address.clone(),
            recipient: mail.to.clone(),
            cc: mail.cc.clone(),
            subject: mail.subject.clone(),
            email_text: mail.text().map(str::to_string),
            status,
            user_id: mail.user_id,
        }
    }
}

/// Email audit repository
#[async_trait]
pub trait EmailRepository: Clone + Send + Sync + 'static {
    /// Inserts an audit record, returning its id
    async fn create_email(&self, email: &NewEmailRecord) -> Result<Uuid, SaveEmailError>;
}

#[cfg(test)]
mock! {
    pub EmailRepository {}

    impl Clone for EmailRepository {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailRepository for EmailRepository {
        async fn create_email(&self, email: &NewEmailRecord) -> Result<Uuid, SaveEmailError>;
    }
}
