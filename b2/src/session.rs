//! Transient values returned by the remote API and used by the following calls of the same
//! operation.

use secrecy::{ExposeSecret, SecretString};

/// The result of authorizing an account.
///
/// A session is never stored by the client; every public operation obtains a new one.
#[derive(Debug)]
pub(crate) struct Session {
    /// The base URL of every call except downloads and uploads.
    pub(crate) api_url: String,
    /// The base URL for downloading files.
    pub(crate) download_url: String,
    /// The token sent with every call made under this session.
    token: SecretString,
}

impl Session {
    pub(crate) fn new(api_url: String, download_url: String, token: String) -> Self {
        Self {
            api_url,
            download_url,
            token: SecretString::from(token),
        }
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// A URL and a token valid for uploading a single file.
///
/// The upload consumes it, so it cannot be used twice.
#[derive(Debug)]
pub(crate) struct UploadTarget {
    pub(crate) upload_url: String,
    token: SecretString,
}

impl UploadTarget {
    pub(crate) fn new(upload_url: String, token: String) -> Self {
        Self {
            upload_url,
            token: SecretString::from(token),
        }
    }

    /// Returns the URL and the token, consuming the target.
    pub(crate) fn into_parts(self) -> (String, SecretString) {
        (self.upload_url, self.token)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_debug_hides_tokens() {
        let session = Session::new(
            String::from("https://api.example.test"),
            String::from("https://download.example.test"),
            String::from("session-secret"),
        );
        let dbg = format!("{:?}", session);
        assert!(dbg.contains("https://api.example.test"), "api_url is shown");
        assert!(!dbg.contains("session-secret"), "token is hidden");
        assert_eq!(session.token(), "session-secret", "token");

        let target = UploadTarget::new(
            String::from("https://pod.example.test/upload"),
            String::from("upload-secret"),
        );
        assert!(!format!("{:?}", target).contains("upload-secret"), "token is hidden");

        let (url, token) = target.into_parts();
        assert_eq!(url, "https://pod.example.test/upload", "upload_url");
        assert_eq!(token.expose_secret(), "upload-secret", "token");
    }
}
