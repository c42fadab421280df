//! The storage engine interface and its B2 implementation.

use crate::name;
use crate::settings::Settings;

use b2::http::{HttpClient, ReqwestClient};
use b2::{Client, Config, Result};

use tracing::{debug, instrument};

/// A backend where a host application stores the data of its files.
///
/// The host picks the engine to write new files with among the ones that
/// [can write](Self::can_write_files), preferring the highest [priority](Self::priority). It
/// keeps the returned handle for reading and deleting the data later.
pub trait StorageEngine {
    /// Returns a stable identifier of the engine. The host stores it along with each handle.
    fn identifier(&self) -> &'static str;

    /// Returns the rank of the engine when the host selects one for writing.
    fn priority(&self) -> u32;

    /// Returns `true` when the engine is configured for writing files.
    fn can_write_files(&self) -> bool;

    /// Stores `data` and returns the handle for reading or deleting it.
    fn write_file(&self, data: &[u8]) -> Result<String>;

    /// Returns the data stored with `handle`.
    fn read_file(&self, handle: &str) -> Result<Vec<u8>>;

    /// Deletes the data stored with `handle`.
    fn delete_file(&self, handle: &str) -> Result<()>;
}

/// Stores the data of the files in a B2 bucket.
///
/// The handles are the IDs of the B2 files. A new [`Client`] is created for every operation from
/// the current settings, so missing settings are reported as configuration errors before any
/// request is sent.
#[derive(Debug)]
pub struct B2Engine<H = ReqwestClient> {
    settings: Settings,
    config: Config,
    http: H,
}

impl B2Engine {
    /// The identifier of the engine.
    pub const IDENTIFIER: &'static str = "backblaze-b2";

    /// The priority of the engine; high, but below the engines maintained upstream by the host.
    pub const PRIORITY: u32 = 99;

    /// Creates an engine which sends the requests over the network.
    pub fn new(settings: Settings, config: Config) -> Result<Self> {
        let http = ReqwestClient::new(&config)?;
        Ok(Self::with_http_client(settings, config, http))
    }
}

impl<H: HttpClient> B2Engine<H> {
    /// Creates an engine which sends the requests through `http`.
    pub fn with_http_client(settings: Settings, config: Config, http: H) -> Self {
        Self {
            settings,
            config,
            http,
        }
    }

    /// Returns the settings of the engine.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn client(&self) -> Result<Client<&H>> {
        let bucket = self.settings.bucket()?;
        let credentials = self.settings.credentials()?;
        Ok(Client::with_http_client(
            credentials,
            bucket,
            &self.config,
            &self.http,
        ))
    }
}

impl<H: HttpClient> StorageEngine for B2Engine<H> {
    fn identifier(&self) -> &'static str {
        B2Engine::IDENTIFIER
    }

    fn priority(&self) -> u32 {
        B2Engine::PRIORITY
    }

    fn can_write_files(&self) -> bool {
        self.settings.is_complete()
    }

    #[instrument(name = "b2", skip_all, fields(method = "uploadFile", size = data.len()))]
    fn write_file(&self, data: &[u8]) -> Result<String> {
        let client = self.client()?;
        let name = name::generate_file_name(&mut rand::rng(), self.settings.instance());
        debug!(name = %name, "writing file");

        client.upload(&name, data)
    }

    #[instrument(name = "b2", skip(self), fields(method = "downloadFile"))]
    fn read_file(&self, handle: &str) -> Result<Vec<u8>> {
        self.client()?.download(handle)
    }

    #[instrument(name = "b2", skip(self), fields(method = "deleteFile"))]
    fn delete_file(&self, handle: &str) -> Result<()> {
        self.client()?.delete(handle)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use b2::fake::FakeServer;

    #[test]
    fn test_metadata() {
        let settings = Settings::new("acct-1", "key-1", "buck-1", "bucket-name");
        let engine = B2Engine::new(settings, Config::default())
            .expect("new shouldn't fail with the default configuration");

        assert_eq!(engine.identifier(), "backblaze-b2", "identifier");
        assert_eq!(engine.priority(), 99, "priority");
        assert!(engine.can_write_files(), "can write files");
    }

    #[test]
    fn test_can_write_files() {
        let server = FakeServer::new(
            &b2::Credentials::new("acct-1", "key-1"),
            &b2::Bucket::new("buck-1", "bucket-name"),
        );

        let mut settings = Settings::new("acct-1", "key-1", "buck-1", "bucket-name");
        settings.bucket_name = Some(String::new());
        let engine = B2Engine::with_http_client(settings, Config::default(), &server);

        assert!(!engine.can_write_files(), "empty bucket name");
        assert_eq!(engine.settings().bucket_id.as_deref(), Some("buck-1"), "settings");
    }
}
