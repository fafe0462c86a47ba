//! Outbound email: composition, delivery and auditing

pub mod emails;
pub mod errors;
pub mod mail;
pub mod mailer;
pub mod transport;
