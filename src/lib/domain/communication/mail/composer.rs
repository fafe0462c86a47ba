//! Builds a [`Mail`] from [`SendParams`]

use crate::domain::communication::{
    mail::{Mail, Recipients, SendParams, Sender},
    mailer::MailerConfig,
};

/// Composes the canonical message for a send.
///
/// Nothing is validated here; a missing subject or malformed address is carried through
/// to the transport as given.
pub fn compose(params: SendParams, config: &MailerConfig) -> Mail {
    let from = params.from.unwrap_or_else(|| Sender {
        name: config.from_name.clone(),
        address: config
            .from_address
            .clone()
            .or_else(|| config.from_name.clone())
            .unwrap_or_default(),
    });

    let to = params
        .to
        .as_ref()
        .map(Recipients::joined)
        .or_else(|| config.admin_email.clone())
        .unwrap_or_default();

    let headers = params
        .headers
        .unwrap_or_else(|| config.headers.iter().cloned().collect());

    Mail {
        from,
        to,
        cc: params.cc.as_ref().map(Recipients::joined),
        subject: params.subject,
        body: params.body,
        headers,
        attachments: params.attachments,
        user_id: params.user_id.or_else(|| config.fallback_user()),
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf};

    use super::*;

    fn config() -> MailerConfig {
        MailerConfig {
            admin_email: Some("admin@acme.test".to_string()),
            from_address: Some("noreply@acme.test".to_string()),
            from_name: Some("Acme".to_string()),
            headers: vec![("X-Mailer".to_string(), "acme".to_string())],
            fallback_user_id: 1,
        }
    }

    #[test]
    fn test_recipient_lists_are_joined() {
        let mail = compose(
            SendParams::text("body")
                .to(["a@x.com", "b@x.com"])
                .cc(vec!["c@x.com", "d@x.com"])
                .subject("Hi"),
            &config(),
        );

        assert_eq!(mail.to, "a@x.com, b@x.com");
        assert_eq!(mail.cc.as_deref(), Some("c@x.com, d@x.com"));
        assert_eq!(mail.subject.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_absent_cc_stays_unset() {
        let mail = compose(SendParams::text("body").to("a@x.com"), &config());

        assert_eq!(mail.cc, None);
    }

    #[test]
    fn test_missing_recipient_falls_back_to_admin() {
        let mail = compose(SendParams::text("body"), &config());

        assert_eq!(mail.to, "admin@acme.test");
    }

    #[test]
    fn test_text_body_sets_only_text() {
        let mail = compose(SendParams::text("body"), &config());

        assert_eq!(mail.text(), Some("body"));
        assert_eq!(mail.html(), None);
    }

    #[test]
    fn test_html_body_sets_only_html() {
        let mail = compose(
            SendParams::html("<p>hi</p>", Some(PathBuf::from("/tmp/x.html"))),
            &config(),
        );

        assert_eq!(mail.text(), None);
        assert_eq!(mail.html(), Some("<p>hi</p>"));
        assert_eq!(mail.html_file_path(), Some(&PathBuf::from("/tmp/x.html")));
    }

    #[test]
    fn test_sender_fallbacks() {
        let explicit = compose(
            SendParams::text("body").from(Sender::new(None, "me@x.com")),
            &config(),
        );
        assert_eq!(explicit.from, Sender::new(None, "me@x.com"));

        let configured = compose(SendParams::text("body"), &config());
        assert_eq!(
            configured.from,
            Sender::new(Some("Acme"), "noreply@acme.test")
        );

        let name_only = compose(
            SendParams::text("body"),
            &MailerConfig {
                from_address: None,
                ..config()
            },
        );
        assert_eq!(name_only.from, Sender::new(Some("Acme"), "Acme"));
    }

    #[test]
    fn test_headers_default_from_config() {
        let defaulted = compose(SendParams::text("body"), &config());
        assert_eq!(
            defaulted.headers,
            BTreeMap::from([("X-Mailer".to_string(), "acme".to_string())])
        );

        let explicit = compose(
            SendParams::text("body").header("X-Campaign", "welcome"),
            &config(),
        );
        assert_eq!(
            explicit.headers,
            BTreeMap::from([("X-Campaign".to_string(), "welcome".to_string())])
        );
    }

    #[test]
    fn test_user_defaults_to_fallback() {
        let defaulted = compose(SendParams::text("body"), &config());
        assert_eq!(defaulted.user_id, Some(1));

        let explicit = compose(SendParams::text("body").user_id(42), &config());
        assert_eq!(explicit.user_id, Some(42));

        let without_fallback = compose(
            SendParams::text("body"),
            &MailerConfig {
                fallback_user_id: 0,
                ..config()
            },
        );
        assert_eq!(without_fallback.user_id, None);
    }

    #[test]
    fn test_status_starts_unset() {
        let mail = compose(SendParams::text("body"), &config());

        assert_eq!(mail.status(), None);
    }
}
