//! Flickr credentials and OAuth 1.0a request signing.
//!
//! The consent handshake that produces an access token happens outside this
//! tool. Here we only load the resulting token set and sign requests with it.

pub mod error;
pub mod oauth;

use std::path::Path;

use self::error::AuthError;

/// API key/secret plus an already-authorized, write-scoped access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("oauth_token", &"<redacted>")
            .field("oauth_token_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Parse the credentials file format: one value per line in the order
    /// API key, API secret, OAuth token, OAuth token secret. Blank lines and
    /// lines starting with `#` are ignored.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, AuthError> {
        let values: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();

        match values.as_slice() {
            [api_key, api_secret, oauth_token, oauth_token_secret, ..] => Ok(Self {
                api_key: api_key.to_string(),
                api_secret: api_secret.to_string(),
                oauth_token: oauth_token.to_string(),
                oauth_token_secret: oauth_token_secret.to_string(),
            }),
            _ => Err(AuthError::Incomplete {
                path: path.to_path_buf(),
                found: values.len(),
            }),
        }
    }
}

/// Read credentials from `path`.
pub async fn read_credentials(path: &Path) -> Result<Credentials, AuthError> {
    tracing::debug!("Reading credentials from {}", path.display());
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AuthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Credentials::parse(&contents, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_lines() {
        let creds = Credentials::parse("key\nsecret\ntoken\ntoken-secret\n", Path::new("x")).unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.api_secret, "secret");
        assert_eq!(creds.oauth_token, "token");
        assert_eq!(creds.oauth_token_secret, "token-secret");
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let contents = "# flickr app\n  key  \n\nsecret\n# access token\ntoken\ntoken-secret\n";
        let creds = Credentials::parse(contents, Path::new("x")).unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.oauth_token_secret, "token-secret");
    }

    #[test]
    fn test_parse_two_lines_is_incomplete() {
        let err = Credentials::parse("key\nsecret\n", Path::new("auth.txt")).unwrap_err();
        match err {
            AuthError::Incomplete { found, .. } => assert_eq!(found, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::parse("key\nsecret\ntoken\nts\n", Path::new("x")).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("key"));
        assert!(!debug.contains("secret\""));
        assert!(!debug.contains("\"token\""));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_credentials(Path::new("/nonexistent/flickrAuthData.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Read { .. }));
    }
}
