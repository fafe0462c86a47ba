//! Mailer configuration

use clap::Parser;

/// Static configuration applied to every outgoing email
#[derive(Clone, Debug, Parser)]
pub struct MailerConfig {
    /// Recipient used when a send does not name one
    #[arg(long = "mailer-admin-email", env = "MAILER_ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// The sender address, usually the SMTP username
    #[arg(long = "mailer-from-address", env = "MAILER_FROM_ADDRESS")]
    pub from_address: Option<String>,

    /// The sender display name
    #[arg(long = "mailer-from-name", env = "MAILER_FROM_NAME")]
    pub from_name: Option<String>,

    /// Default headers, one `Name: value` per line
    #[arg(
        long = "mailer-header",
        env = "MAILER_HEADERS",
        value_delimiter = '\n',
        value_parser = parse_header
    )]
    pub headers: Vec<(String, String)>,

    /// User linked to emails sent without one, `0` disables the fallback
    #[arg(
        long = "mailer-fallback-user-id",
        env = "MAILER_FALLBACK_USER_ID",
        default_value_t = 1
    )]
    pub fallback_user_id: i64,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            from_address: None,
            from_name: None,
            headers: vec![],
            fallback_user_id: 1,
        }
    }
}

impl MailerConfig {
    /// The fallback user, if one is configured
    pub fn fallback_user(&self) -> Option<i64> {
        (self.fallback_user_id > 0).then_some(self.fallback_user_id)
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;

    let name = name.trim();

    if name.is_empty() {
        return Err(format!("missing header name in `{raw}`"));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_parse_header() -> TestResult {
        assert_eq!(
            parse_header("X-Mailer:  acme ")?,
            ("X-Mailer".to_string(), "acme".to_string())
        );

        Ok(())
    }

    #[test]
    fn test_parse_header_without_separator_is_invalid() {
        assert!(parse_header("X-Mailer").is_err());
        assert!(parse_header(": acme").is_err());
    }

    #[test]
    fn test_config_from_args() -> TestResult {
        let config = MailerConfig::try_parse_from([
            "mailer",
            "--mailer-admin-email",
            "admin@acme.test",
            "--mailer-header",
            "X-Mailer: acme; build=7\nX-Priority: 3",
        ])?;

        assert_eq!(config.admin_email.as_deref(), Some("admin@acme.test"));
        assert_eq!(
            config.headers,
            vec![
                ("X-Mailer".to_string(), "acme; build=7".to_string()),
                ("X-Priority".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(config.fallback_user(), Some(1));

        Ok(())
    }

    #[test]
    fn test_zero_disables_fallback_user() {
        let config = MailerConfig {
            fallback_user_id: 0,
            ..Default::default()
        };

        assert_eq!(config.fallback_user(), None);
    }
}
