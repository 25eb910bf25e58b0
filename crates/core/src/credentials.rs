//! Access-key / secret-key credentials
//!
//! Credentials are supplied once at client construction and held for the
//! client's lifetime. They are validated eagerly so that signing never has to
//! deal with a missing key.

use std::fmt;

use crate::error::{Error, Result};

/// Environment variable holding the access key
pub const ENV_ACCESS_KEY: &str = "BCE_ACCESS_KEY_ID";

/// Environment variable holding the secret key
pub const ENV_SECRET_KEY: &str = "BCE_SECRET_ACCESS_KEY";

/// Environment variable holding an optional STS session token
pub const ENV_SESSION_TOKEN: &str = "BCE_SESSION_TOKEN";

/// An access-key / secret-key pair, optionally with a session token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
}

impl Credentials {
    /// Create credentials, rejecting empty keys
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let creds = Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        };
        creds.validate()?;
        Ok(creds)
    }

    /// Create temporary credentials issued by STS
    pub fn with_session_token(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Result<Self> {
        let session_token = session_token.into();
        if session_token.trim().is_empty() {
            return Err(Error::Credentials("session token should not be empty".into()));
        }
        let mut creds = Self::new(access_key, secret_key)?;
        creds.session_token = Some(session_token);
        Ok(creds)
    }

    /// Load credentials from `BCE_ACCESS_KEY_ID` / `BCE_SECRET_ACCESS_KEY`
    ///
    /// Returns `Ok(None)` when neither variable is set.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let access_key = lookup(ENV_ACCESS_KEY);
        let secret_key = lookup(ENV_SECRET_KEY);

        match (access_key, secret_key) {
            (None, None) => Ok(None),
            (Some(ak), Some(sk)) => match lookup(ENV_SESSION_TOKEN) {
                Some(token) => Self::with_session_token(ak, sk, token).map(Some),
                None => Self::new(ak, sk).map(Some),
            },
            _ => Err(Error::Credentials(format!(
                "both {ENV_ACCESS_KEY} and {ENV_SECRET_KEY} must be set"
            ))),
        }
    }

    /// Check that neither key is empty
    fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(Error::Credentials("access key should not be empty".into()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(Error::Credentials("secret key should not be empty".into()));
        }
        Ok(())
    }

    /// The access key
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The secret key
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// The session token, for temporary credentials
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_credentials_new() {
        let creds = Credentials::new("ak", "sk").unwrap();
        assert_eq!(creds.access_key(), "ak");
        assert_eq!(creds.secret_key(), "sk");
        assert!(creds.session_token().is_none());
    }

    #[test]
    fn test_credentials_reject_empty() {
        assert!(matches!(
            Credentials::new("", "sk"),
            Err(Error::Credentials(_))
        ));
        assert!(matches!(
            Credentials::new("ak", "  "),
            Err(Error::Credentials(_))
        ));
        assert!(Credentials::with_session_token("ak", "sk", "").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::with_session_token("ak", "super-secret", "sts-token-xyz").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("ak"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("sts-token-xyz"));
    }

    #[test]
    fn test_from_lookup() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_ACCESS_KEY, "ak"),
            (ENV_SECRET_KEY, "sk"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(creds.access_key(), "ak");

        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_ACCESS_KEY, "ak"),
            (ENV_SECRET_KEY, "sk"),
            (ENV_SESSION_TOKEN, "tok"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(creds.session_token(), Some("tok"));

        assert!(Credentials::from_lookup(lookup_from(&[])).unwrap().is_none());
        assert!(Credentials::from_lookup(lookup_from(&[(ENV_ACCESS_KEY, "ak")])).is_err());
    }

    #[test]
    fn test_from_lookup_rejects_blank_values() {
        let result = Credentials::from_lookup(lookup_from(&[
            (ENV_ACCESS_KEY, ""),
            (ENV_SECRET_KEY, "sk"),
        ]));
        assert!(matches!(result, Err(Error::Credentials(_))));
    }
}
