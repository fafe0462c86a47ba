//! Canonical email message

mod composer;
mod params;

use std::{collections::BTreeMap, fmt, path::PathBuf};

use serde::Serialize;

pub use composer::compose;
pub use params::{Recipients, SendParams};

/// The identity an email is sent from
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Sender {
    /// Display name
    pub name: Option<String>,

    /// Email address
    pub address: String,
}

impl Sender {
    /// Creates a new sender
    pub fn new(name: Option<&str>, address: &str) -> Self {
        Self {
            name: name.map(str::to_string),
            address: address.to_string(),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Body of an email, either plain text or rendered HTML
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// Plain text body
    Text(String),

    /// Rendered HTML body
    Html {
        /// The HTML content
        html: String,

        /// Path of the file the HTML was rendered to, if any
        file_path: Option<PathBuf>,
    },
}

/// Outcome of a delivery attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailStatus {
    /// The transport accepted the message
    Sent,

    /// The message could not be delivered
    NotSent,
}

impl MailStatus {
    /// The value stored in the audit table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::NotSent => "not_sent",
        }
    }
}

impl fmt::Display for MailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file attached to an email
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// File name shown to the recipient
    pub filename: String,

    /// MIME type, e.g. `application/pdf`
    pub content_type: String,

    /// Raw content
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// A fully composed email, ready for dispatch
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Mail {
    /// The sender
    pub from: Sender,

    /// Recipients, comma separated
    pub to: String,

    /// Carbon copy recipients, comma separated
    pub cc: Option<String>,

    /// Subject line
    pub subject: Option<String>,

    /// Message body
    pub body: Body,

    /// Extra headers
    pub headers: BTreeMap<String, String>,

    /// Attachments, passed through to the transport untouched
    pub attachments: Vec<Attachment>,

    /// The user the email is sent on behalf of
    pub user_id: Option<i64>,

    status: Option<MailStatus>,
}

impl Mail {
    /// The plain text body, if this is a text email
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            Body::Html { .. } => None,
        }
    }

    /// The HTML body, if this is an HTML email
    pub fn html(&self) -> Option<&str> {
        match &self.body {
            Body::Html { html, .. } => Some(html),
            Body::Text(_) => None,
        }
    }

    /// The file the HTML body was rendered to
    pub fn html_file_path(&self) -> Option<&PathBuf> {
        match &self.body {
            Body::Html { file_path, .. } => file_path.as_ref(),
            Body::Text(_) => None,
        }
    }

    /// Delivery status, unset until the delivery attempt completes
    pub fn status(&self) -> Option<MailStatus> {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: MailStatus) {
        self.status = Some(status);
    }
}
