//! SMTP mail transport implementation

use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{
        header::{ContentType, HeaderName, HeaderValue},
        Attachment, Mailbox, Mailboxes, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::domain::communication::{
    errors::TransportError,
    mail::{Body, Mail},
    transport::{DeliveryInfo, MailTransport},
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD")]
    pub password: Option<String>,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection), otherwise connect over TLS directly
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,

    /// Timeout for each SMTP command, in seconds
    #[clap(long = "smtp-timeout-secs", env = "SMTP_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// SMTP mail transport
#[derive(Debug, Clone)]
pub struct SMTPTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SMTPTransport {
    /// Create a new SMTP transport
    pub fn new(config: &SMTPConfig) -> Result<Self, TransportError> {
        let tls = TlsParameters::builder(config.host.to_string())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .build()?;

        let relay = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.tls(Tls::Required(tls))
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?.tls(Tls::Wrapper(tls))
        };

        let relay = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                relay.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => relay,
        };

        Ok(Self {
            transport: relay
                .port(config.port)
                .timeout(config.timeout_secs.map(Duration::from_secs))
                .build(),
        })
    }

    /// The underlying lettre transport
    pub fn raw(&self) -> &AsyncSmtpTransport<Tokio1Executor> {
        &self.transport
    }
}

/// Converts a [`Mail`] into a MIME message
pub fn build_message(mail: &Mail) -> Result<Message, TransportError> {
    let from = Mailbox::new(mail.from.name.clone(), mail.from.address.parse()?);

    let mut builder = Message::builder().from(from);

    for mailbox in mail.to.parse::<Mailboxes>()? {
        builder = builder.to(mailbox);
    }

    if let Some(cc) = &mail.cc {
        for mailbox in cc.parse::<Mailboxes>()? {
            builder = builder.cc(mailbox);
        }
    }

    if let Some(subject) = &mail.subject {
        builder = builder.subject(subject);
    }

    for (name, value) in &mail.headers {
        let header = HeaderName::new_from_ascii(name.clone())
            .map_err(|_| TransportError::InvalidHeader(name.clone()))?;

        builder = builder.raw_header(HeaderValue::new(header, value.clone()));
    }

    let body = match &mail.body {
        Body::Text(text) => SinglePart::plain(text.clone()),
        Body::Html { html, .. } => SinglePart::html(html.clone()),
    };

    if mail.attachments.is_empty() {
        return Ok(builder.singlepart(body)?);
    }

    let mut parts = MultiPart::mixed().singlepart(body);

    for attachment in &mail.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|_| TransportError::InvalidHeader(attachment.content_type.clone()))?;

        parts = parts.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    Ok(builder.multipart(parts)?)
}

#[async_trait]
impl MailTransport for SMTPTransport {
    #[mutants::skip]
    async fn verify(&self) -> Result<bool, TransportError> {
        Ok(self.transport.test_connection().await?)
    }

    #[mutants::skip]
    async fn send(&self, mail: &Mail) -> Result<DeliveryInfo, TransportError> {
        let response = self.transport.send(build_message(mail)?).await?;

        Ok(DeliveryInfo {
            code: response.code().to_string(),
            message: response.message().map(str::to_string).collect(),
        })
    }
}
