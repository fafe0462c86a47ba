//! Parameters accepted by the mailer

use std::{collections::BTreeMap, path::PathBuf};

use crate::domain::communication::mail::{Attachment, Body, Sender};

/// One recipient, or a list of them
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recipients {
    /// A single address, or an already joined list
    One(String),

    /// A list of addresses
    Many(Vec<String>),
}

impl Recipients {
    /// Collapses the recipients into a single `", "` separated string
    pub fn joined(&self) -> String {
        match self {
            Self::One(address) => address.clone(),
            Self::Many(addresses) => addresses.join(", "),
        }
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::One(address.to_string())
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self::One(address)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self::Many(addresses)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(addresses: Vec<&str>) -> Self {
        Self::Many(addresses.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Self::Many(addresses.iter().map(|a| a.to_string()).collect())
    }
}

/// Parameters for sending an email
///
/// The body is chosen up front with [`SendParams::text`] or [`SendParams::html`], so a
/// message can never carry both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendParams {
    /// Recipients, defaults to the administrator address
    pub to: Option<Recipients>,

    /// Carbon copy recipients
    pub cc: Option<Recipients>,

    /// Subject line
    pub subject: Option<String>,

    /// Message body
    pub body: Body,

    /// Headers, defaults to the configured headers
    pub headers: Option<BTreeMap<String, String>>,

    /// Sender override
    pub from: Option<Sender>,

    /// Attachments
    pub attachments: Vec<Attachment>,

    /// The user sending the email, defaults to the configured fallback user
    pub user_id: Option<i64>,
}

impl SendParams {
    fn new(body: Body) -> Self {
        Self {
            to: None,
            cc: None,
            subject: None,
            body,
            headers: None,
            from: None,
            attachments: vec![],
            user_id: None,
        }
    }

    /// Parameters for a plain text email
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Body::Text(text.into()))
    }

    /// Parameters for an HTML email, optionally remembering the file it was rendered to
    pub fn html(html: impl Into<String>, file_path: Option<PathBuf>) -> Self {
        Self::new(Body::Html {
            html: html.into(),
            file_path,
        })
    }

    /// Sets the recipients
    pub fn to(mut self, to: impl Into<Recipients>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the carbon copy recipients
    pub fn cc(mut self, cc: impl Into<Recipients>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    /// Sets the subject
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Adds a header, replacing the configured defaults
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Overrides the sender
    pub fn from(mut self, from: Sender) -> Self {
        self.from = Some(from);
        self
    }

    /// Adds an attachment
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets the user sending the email
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
