//! HTTP Basic credential parsing

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Email/password pair decoded from a `Basic` authorization payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode the base64 payload of `Authorization: Basic <payload>`.
    ///
    /// Returns `None` for invalid base64, non-UTF-8 bytes, or a missing
    /// `email:password` separator. Callers treat every variant the same as
    /// a failed login.
    pub fn decode(payload: &str) -> Option<Self> {
        let bytes = STANDARD.decode(payload.trim()).ok()?;
        let decoded = String::from_utf8(bytes).ok()?;
        let (email, password) = decoded.split_once(':')?;

        Some(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        STANDARD.encode(raw)
    }

    #[test]
    fn decodes_email_and_password() {
        let creds = BasicCredentials::decode(&encode("user@example.com:hunter2")).unwrap();

        assert_eq!(creds.email, "user@example.com");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = BasicCredentials::decode(&encode("user@example.com:pa:ss")).unwrap();

        assert_eq!(creds.password, "pa:ss");
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(BasicCredentials::decode("%%%not-base64%%%").is_none());
        assert!(BasicCredentials::decode(&encode("missing-separator")).is_none());
    }
}
