//! Application configuration

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use crate::{
    domain::communication::mailer::{MailerConfig, MailerServiceImpl},
    infrastructure::{
        db::postgres::{DatabaseConnectionDetails, PostgresDatabase},
        email::smtp::{SMTPConfig, SMTPTransport},
    },
};

/// Environment variables needed to run the mailer
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The mailer defaults
    #[clap(flatten)]
    pub mailer: MailerConfig,

    /// The database connection details
    #[clap(flatten)]
    pub db: DatabaseConnectionDetails,
}

/// The mailer wired to SMTP and Postgres
pub type Mailer = MailerServiceImpl<SMTPTransport, PostgresDatabase>;

impl Config {
    /// Loads `.env`, if present, and reads the configuration from the environment
    #[mutants::skip]
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        Ok(Self::try_parse_from([env!("CARGO_PKG_NAME")])?)
    }

    /// The mailer defaults, sending from the SMTP login when no sender address is set
    pub fn mailer_config(&self) -> MailerConfig {
        MailerConfig {
            from_address: self
                .mailer
                .from_address
                .clone()
                .or_else(|| self.smtp.username.clone()),
            ..self.mailer.clone()
        }
    }

    /// Connects to the database and builds the mailer.
    ///
    /// The SMTP connection is not verified until the first send.
    #[mutants::skip]
    pub async fn into_mailer(self) -> Result<Mailer> {
        let transport = SMTPTransport::new(&self.smtp)?;
        let postgres = PostgresDatabase::new(&self.db.connection_string).await?;

        Ok(MailerServiceImpl::new(
            Arc::new(transport),
            Arc::new(postgres),
            self.mailer_config(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::communication::mail::{compose, SendParams, Sender};

    use super::*;

    fn args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
        let mut args = vec![
            "mailer",
            "--smtp-host",
            "smtp.acme.test",
            "--smtp-port",
            "587",
            "--database-url",
            "postgres://localhost/mailer",
            "--mailer-from-name",
            "Acme",
        ];
        args.extend_from_slice(extra);
        args
    }

    #[test]
    fn test_config_from_args() -> TestResult {
        let config = Config::try_parse_from(args(&[]))?;

        assert_eq!(config.smtp.host, "smtp.acme.test");
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.starttls);
        assert_eq!(config.db.connection_string, "postgres://localhost/mailer");
        assert_eq!(config.mailer.from_name.as_deref(), Some("Acme"));
        assert_eq!(config.mailer.fallback_user(), Some(1));
        assert_eq!(config.mailer_config().from_address, None);

        Ok(())
    }

    #[test]
    fn test_sender_defaults_to_smtp_user() -> TestResult {
        let config = Config::try_parse_from(args(&["--smtp-user", "noreply@acme.test"]))?;

        let mail = compose(SendParams::text("body"), &config.mailer_config());

        assert_eq!(mail.from, Sender::new(Some("Acme"), "noreply@acme.test"));

        Ok(())
    }

    #[test]
    fn test_configured_sender_address_wins_over_smtp_user() -> TestResult {
        let config = Config::try_parse_from(args(&[
            "--smtp-user",
            "login@acme.test",
            "--mailer-from-address",
            "hello@acme.test",
        ]))?;

        assert_eq!(
            config.mailer_config().from_address.as_deref(),
            Some("hello@acme.test")
        );

        Ok(())
    }
}
