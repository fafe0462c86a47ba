//! Mailer module

mod config;
mod service;

pub use config::MailerConfig;
pub use service::{MailerService, MailerServiceImpl, Sent};
