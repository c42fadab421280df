//! Host settings used by the B2 storage engine.

use b2::{Bucket, Credentials, Error, Result};

use std::fmt;

use serde::Deserialize;

/// Host key of the account ID.
pub const ACCOUNT_ID: &str = "backblaze-b2.account-id";
/// Host key of the application key.
pub const APPLICATION_KEY: &str = "backblaze-b2.application-key";
/// Host key of the bucket ID.
pub const BUCKET_ID: &str = "storage.b2.bucket-id";
/// Host key of the bucket name.
pub const BUCKET_NAME: &str = "storage.b2.bucket-name";
/// Host key of the name of the instance, which prefixes the names of the files when it's set.
pub const INSTANCE: &str = "cluster.instance";

/// Describes one setting for registering it in the host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingOption {
    /// The host key.
    pub key: &'static str,
    /// A short description.
    pub summary: &'static str,
    /// Whether it can only be changed by editing the host configuration files.
    pub locked: bool,
    /// Whether its value is never shown.
    pub hidden: bool,
}

/// The four settings that the engine requires. All of them are secret-like, so they are locked
/// and hidden.
pub const OPTIONS: [SettingOption; 4] = [
    SettingOption {
        key: ACCOUNT_ID,
        summary: "Account ID for Backblaze B2 Storage.",
        locked: true,
        hidden: true,
    },
    SettingOption {
        key: APPLICATION_KEY,
        summary: "Application key for B2 storage.",
        locked: true,
        hidden: true,
    },
    SettingOption {
        key: BUCKET_NAME,
        summary: "Bucket name for file storage.",
        locked: true,
        hidden: true,
    },
    SettingOption {
        key: BUCKET_ID,
        summary: "Bucket ID for file storage. It must be the ID of the bucket named in \
                  `storage.b2.bucket-name`.",
        locked: true,
        hidden: true,
    },
];

/// The values of the engine settings.
///
/// A setting which is absent, `null` or an empty string is unset.
#[derive(Clone, Default, Deserialize)]
pub struct Settings {
    /// The account ID.
    #[serde(rename = "backblaze-b2.account-id", default)]
    pub account_id: Option<String>,
    /// The application key.
    #[serde(rename = "backblaze-b2.application-key", default)]
    pub application_key: Option<String>,
    /// The ID of the bucket.
    #[serde(rename = "storage.b2.bucket-id", default)]
    pub bucket_id: Option<String>,
    /// The name of the bucket.
    #[serde(rename = "storage.b2.bucket-name", default)]
    pub bucket_name: Option<String>,
    /// The name of the instance.
    #[serde(rename = "cluster.instance", default)]
    pub instance: Option<String>,
}

impl Settings {
    /// Creates settings with the four required values and without instance.
    pub fn new(
        account_id: &str,
        application_key: &str,
        bucket_id: &str,
        bucket_name: &str,
    ) -> Self {
        Self {
            account_id: Some(String::from(account_id)),
            application_key: Some(String::from(application_key)),
            bucket_id: Some(String::from(bucket_id)),
            bucket_name: Some(String::from(bucket_name)),
            instance: None,
        }
    }

    /// Parses the settings from a JSON object of host keys to values. Keys which aren't engine
    /// settings are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| Error::new_configuration("<all>", &format!("invalid JSON. {}", err)))
    }

    /// Returns `true` when the four required settings are set.
    pub fn is_complete(&self) -> bool {
        [
            &self.account_id,
            &self.application_key,
            &self.bucket_id,
            &self.bucket_name,
        ]
        .into_iter()
        .all(|v| non_empty(v).is_some())
    }

    /// Returns the instance name if it's set.
    pub fn instance(&self) -> Option<&str> {
        non_empty(&self.instance)
    }

    /// Returns the bucket or an error naming the first missing setting.
    pub(crate) fn bucket(&self) -> Result<Bucket> {
        let id = required(&self.bucket_id, BUCKET_ID)?;
        let name = required(&self.bucket_name, BUCKET_NAME)?;
        Ok(Bucket::new(id, name))
    }

    /// Returns the credentials or an error naming the first missing setting.
    pub(crate) fn credentials(&self) -> Result<Credentials> {
        let account_id = required(&self.account_id, ACCOUNT_ID)?;
        let application_key = required(&self.application_key, APPLICATION_KEY)?;
        Ok(Credentials::new(account_id, application_key))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("account_id", &self.account_id)
            .field("bucket_id", &self.bucket_id)
            .field("bucket_name", &self.bucket_name)
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    non_empty(value)
        .ok_or_else(|| Error::new_configuration(key, &format!("No '{}' specified!", key)))
}
