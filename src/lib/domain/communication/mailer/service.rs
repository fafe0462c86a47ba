//! Mailer service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::communication::{
    emails::{EmailRepository, NewEmailRecord},
    errors::{MailerError, SaveEmailError},
    mail::{compose, Mail, MailStatus, SendParams},
    mailer::MailerConfig,
    transport::{DeliveryInfo, MailTransport, TransportState},
};

/// A successfully delivered email
#[derive(Debug)]
pub struct Sent {
    /// The transport's delivery receipt
    pub info: DeliveryInfo,

    /// The message that was sent
    pub mail: Mail,
}

/// Mailer service
#[async_trait]
pub trait MailerService: Clone + Send + Sync + 'static {
    /// Sends an email and records the attempt.
    ///
    /// # Arguments
    /// * `params` - The [`SendParams`] describing the email.
    ///
    /// # Returns
    /// - [`Ok`] with the [`Sent`] receipt and message if the email was delivered and recorded.
    /// - [`Err`] containing a [`MailerError`] otherwise. A delivery failure carries the
    ///   attempted [`Mail`].
    async fn send(&self, params: SendParams) -> Result<Sent, MailerError>;

    /// Sets the status of `mail` and writes its audit record.
    ///
    /// For callers that deliver the message themselves.
    async fn save_mail(&self, mail: &mut Mail, was_sent: bool) -> Result<(), SaveEmailError>;
}

/// Mailer service implementation
#[derive(Debug, Clone)]
pub struct MailerServiceImpl<T, R>
where
    T: MailTransport,
    R: EmailRepository,
{
    transport: Arc<T>,
    emails: Arc<R>,
    config: Arc<MailerConfig>,
    state: Arc<TransportState>,
}

impl<T, R> MailerServiceImpl<T, R>
where
    T: MailTransport,
    R: EmailRepository,
{
    /// Creates a new mailer service with its own, unverified, transport state.
    pub fn new(transport: Arc<T>, emails: Arc<R>, config: MailerConfig) -> Self {
        Self::with_state(transport, emails, config, Arc::new(TransportState::new()))
    }

    /// Creates a new mailer service sharing an existing transport state.
    pub fn with_state(
        transport: Arc<T>,
        emails: Arc<R>,
        config: MailerConfig,
        state: Arc<TransportState>,
    ) -> Self {
        Self {
            transport,
            emails,
            config: Arc::new(config),
            state,
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The transport readiness state
    pub fn state(&self) -> &Arc<TransportState> {
        &self.state
    }

    async fn ensure_ready(&self) -> Result<(), MailerError> {
        if !self.state.is_ready() && self.transport.verify().await.map_err(MailerError::Verify)? {
            self.state.mark_ready();

            info!(target: "mailer", "mailer connected");
        }

        if !self.state.is_ready() {
            return Err(MailerError::NotConnected);
        }

        Ok(())
    }

    async fn record(&self, mail: &mut Mail, was_sent: bool) -> Result<(), MailerError> {
        self.save_mail(mail, was_sent).await.map_err(|err| {
            error!(target: "mailer", error = %err, to = %mail.to, "could not record email");

            MailerError::Record(err)
        })
    }
}

#[async_trait]
impl<T, R> MailerService for MailerServiceImpl<T, R>
where
    T: MailTransport,
    R: EmailRepository,
{
    async fn send(&self, params: SendParams) -> Result<Sent, MailerError> {
        if let Err(err) = self.ensure_ready().await {
            error!(target: "mailer", error = %err, "mail transport is not ready");

            let mut mail = compose(params, &self.config);
            self.record(&mut mail, false).await?;

            return Err(err);
        }

        let mut mail = compose(params, &self.config);

        match self.transport.send(&mail).await {
            Ok(info) => {
                debug!(target: "mailer", code = %info.code, to = %mail.to, "email sent");

                self.record(&mut mail, true).await?;

                Ok(Sent { info, mail })
            }
            Err(source) => {
                error!(target: "mailer", error = %source, to = %mail.to, "could not send email");

                self.record(&mut mail, false).await?;

                Err(MailerError::Delivery {
                    source,
                    mail: Box::new(mail),
                })
            }
        }
    }

    async fn save_mail(&self, mail: &mut Mail, was_sent: bool) -> Result<(), SaveEmailError> {
        let status = if was_sent {
            MailStatus::Sent
        } else {
            MailStatus::NotSent
        };

        mail.set_status(status);

        let id = self
            .emails
            .create_email(&NewEmailRecord::new(mail, status))
            .await?;

        debug!(target: "mailer", %id, %status, "email recorded");

        Ok(())
    }
}
