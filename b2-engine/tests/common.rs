#![allow(dead_code)]

use std::time::Duration;

use b2::fake::FakeServer;
use b2::{Bucket, Config, Credentials};
use b2_engine::{B2Engine, Settings};

pub const ACCOUNT_ID: &str = "acct-1";
pub const APPLICATION_KEY: &str = "key-1";
pub const BUCKET_ID: &str = "buck-1";
pub const BUCKET_NAME: &str = "bucket-name";

pub fn settings() -> Settings {
    Settings::new(ACCOUNT_ID, APPLICATION_KEY, BUCKET_ID, BUCKET_NAME)
}

pub fn config() -> Config {
    Config::with_authorize_url(
        "b2-engine-test",
        Duration::from_secs(5),
        &FakeServer::authorize_url(),
    )
    .expect("fake server authorize URL is valid")
}

/// Returns a server for the test account and bucket.
pub fn server() -> FakeServer {
    FakeServer::new(
        &Credentials::new(ACCOUNT_ID, APPLICATION_KEY),
        &Bucket::new(BUCKET_ID, BUCKET_NAME),
    )
}

/// Returns an engine with `settings` which sends the requests to `server`.
pub fn engine(server: &FakeServer, settings: Settings) -> B2Engine<&FakeServer> {
    B2Engine::with_http_client(settings, config(), server)
}
