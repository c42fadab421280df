//! B2 client configuration.

use crate::{Error, Result};

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};

/// The endpoint used for authorizing an account when the configuration doesn't override it.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://api.backblazeb2.com/b2api/v1/b2_authorize_account";

/// The account ID and application key used for authorizing every operation.
///
/// Neither value is validated; an invalid pair is reported by the remote API when authorizing.
#[derive(Debug, Clone)]
pub struct Credentials {
    account_id: String,
    application_key: SecretString,
}

impl Credentials {
    /// Creates credentials from an account ID and one of its application keys.
    pub fn new(account_id: &str, application_key: &str) -> Self {
        Self {
            account_id: String::from(account_id),
            application_key: SecretString::from(application_key),
        }
    }

    /// Returns the account ID.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the value of the `Authorization` header of the account authorization, which is the
    /// Base64 of `<account_id>:<application_key>` prefixed by the `Basic` scheme.
    pub(crate) fn basic_authorization(&self) -> String {
        let plain = format!(
            "{}:{}",
            self.account_id,
            self.application_key.expose_secret()
        );
        format!("Basic {}", B64.encode(plain))
    }
}

/// The bucket which holds the files managed by a client.
///
/// Both fields are required; the ID is the one sent to the remote API, and the name identifies it
/// for humans and host settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// ID of the bucket.
    pub id: String,
    /// Name of the bucket.
    pub name: String,
}

impl Bucket {
    /// Creates a bucket reference.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: String::from(id),
            name: String::from(name),
        }
    }
}

/// Defines how a client reaches the remote API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identifies the application that is contacting the remote API.
    user_agent: String,
    /// Maximum duration of each request, from connecting until the body is read.
    timeout: Duration,
    /// The URL of the account authorization call. The URLs of the rest of the calls are returned
    /// by it.
    authorize_url: String,
}

impl Config {
    /// Creates a configuration with the specific user agent and timeout which authorizes accounts
    /// against [`DEFAULT_AUTHORIZE_URL`].
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        Self {
            user_agent: String::from(user_agent),
            timeout,
            authorize_url: String::from(DEFAULT_AUTHORIZE_URL),
        }
    }

    /// Creates a configuration with the specific user agent and timeout which authorizes accounts
    /// against `authorize_url`.
    ///
    /// It returns an error if `authorize_url` isn't an absolute HTTP(S) URL.
    pub fn with_authorize_url(
        user_agent: &str,
        timeout: Duration,
        authorize_url: &str,
    ) -> Result<Self> {
        match url::Url::parse(authorize_url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            Ok(u) => {
                return Err(Error::new_configuration(
                    "authorize_url",
                    &format!("unsupported scheme {:?}", u.scheme()),
                ));
            }
            Err(err) => {
                return Err(Error::new_configuration(
                    "authorize_url",
                    &format!("invalid URL. {}", err),
                ));
            }
        }

        Ok(Self {
            authorize_url: String::from(authorize_url),
            ..Self::new(user_agent, timeout)
        })
    }

    /// Returns the configured user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the URL used for authorizing accounts.
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            concat!(env!("CARGO_PKG_NAME"), "-rust/", env!("CARGO_PKG_VERSION")),
            Duration::from_secs(60),
        )
    }
}
