//! Error types for the communication module

use anyhow::anyhow;
use lettre::address::AddressError;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mail::Mail;

/// Errors raised by a mail transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// An address could not be parsed
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// A header name or content type was rejected
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<AddressError> for TransportError {
    fn from(err: AddressError) -> Self {
        TransportError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for TransportError {
    fn from(err: lettre::error::Error) -> Self {
        TransportError::UnknownError(err.into())
    }
}

impl From<lettre::transport::smtp::Error> for TransportError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        TransportError::UnknownError(err.into())
    }
}

/// Errors that can occur when recording an email
#[derive(Debug, Error)]
pub enum SaveEmailError {
    /// The linked user does not exist
    #[error("user {0:?} not found")]
    UserNotFound(Option<i64>),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl SaveEmailError {
    /// Attaches the user the record was linked to
    pub fn for_user(self, user_id: Option<i64>) -> Self {
        match self {
            SaveEmailError::UserNotFound(_) => SaveEmailError::UserNotFound(user_id),
            err => err,
        }
    }
}

impl From<sqlx::Error> for SaveEmailError {
    fn from(err: sqlx::Error) -> Self {
        debug!("sqlxError: {:?}", err);

        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::ForeignKeyViolation => SaveEmailError::UserNotFound(None),
                _ => SaveEmailError::UnknownError(anyhow!("Unknown database error: {:?}", db_err)),
            },
            _ => SaveEmailError::UnknownError(anyhow!("Unknown database error: {:?}", err)),
        }
    }
}

/// Errors returned when sending an email
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport handshake finished but the transport is still not usable
    #[error("Email Client Not Connected")]
    NotConnected,

    /// The transport handshake failed
    #[error("could not verify the mail transport")]
    Verify(#[source] TransportError),

    /// The transport rejected the email
    #[error("could not deliver the email")]
    Delivery {
        /// The transport error
        source: TransportError,

        /// The message that was attempted
        mail: Box<Mail>,
    },

    /// The outcome could not be recorded
    #[error("could not record the email")]
    Record(#[from] SaveEmailError),
}

impl MailerError {
    /// Machine readable status code, following HTTP semantics
    pub fn status_code(&self) -> u16 {
        500
    }

    /// The attempted message, for failed deliveries
    pub fn mail(&self) -> Option<&Mail> {
        match self {
            Self::Delivery { mail, .. } => Some(mail.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_sqlx_error_is_unknown() {
        let err = SaveEmailError::from(sqlx::Error::RowNotFound);

        assert!(matches!(err, SaveEmailError::UnknownError(_)));
    }

    #[test]
    fn test_for_user_fills_missing_user() {
        let err = SaveEmailError::UserNotFound(None).for_user(Some(7));

        assert!(matches!(err, SaveEmailError::UserNotFound(Some(7))));
        assert_eq!(err.to_string(), "user Some(7) not found");
    }

    #[test]
    fn test_for_user_keeps_other_errors() {
        let err = SaveEmailError::UnknownError(anyhow!("database is down")).for_user(Some(7));

        assert!(matches!(err, SaveEmailError::UnknownError(_)));
    }
}
