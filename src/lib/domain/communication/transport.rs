//! Mail transport port and readiness tracking

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{errors::TransportError, mail::Mail};

/// Receipt returned by the transport for an accepted message
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryInfo {
    /// Server reply code
    pub code: String,

    /// Server reply lines
    pub message: Vec<String>,
}

/// Outbound mail transport
#[async_trait]
pub trait MailTransport: Clone + Send + Sync + 'static {
    /// Performs a handshake with the mail server.
    ///
    /// # Returns
    /// - [`Ok`] with `true` if the server is ready to accept mail.
    /// - [`Ok`] with `false` if the handshake completed but the server is not usable.
    /// - [`Err`] containing a [`TransportError`] if the handshake failed.
    async fn verify(&self) -> Result<bool, TransportError>;

    /// Sends a composed [`Mail`].
    ///
    /// # Returns
    /// A [`Result`] containing the server's [`DeliveryInfo`] if the message was accepted.
    async fn send(&self, mail: &Mail) -> Result<DeliveryInfo, TransportError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    impl Clone for MailTransport {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn verify(&self) -> Result<bool, TransportError>;
        async fn send(&self, mail: &Mail) -> Result<DeliveryInfo, TransportError>;
    }
}

/// Whether the transport handshake has succeeded.
///
/// Starts out not ready and is never reset. Access is not serialised, so concurrent first
/// sends may each run the handshake.
#[derive(Debug, Default)]
pub struct TransportState {
    ready: AtomicBool,
}

impl TransportState {
    /// Creates a new, not yet verified, state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the transport has been verified
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub(crate) fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state_starts_not_ready() {
        let state = TransportState::new();

        assert!(!state.is_ready());

        state.mark_ready();
        state.mark_ready();

        assert!(state.is_ready());
    }
}
