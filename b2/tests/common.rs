#![allow(dead_code)]

use std::time::Duration;

use b2::fake::FakeServer;
use b2::{Bucket, Client, Config, Credentials};

pub const ACCOUNT_ID: &str = "acct-1";
pub const APPLICATION_KEY: &str = "key-1";
pub const BUCKET_ID: &str = "buck-1";
pub const BUCKET_NAME: &str = "bucket-name";

pub fn credentials() -> Credentials {
    Credentials::new(ACCOUNT_ID, APPLICATION_KEY)
}

pub fn bucket() -> Bucket {
    Bucket::new(BUCKET_ID, BUCKET_NAME)
}

pub fn config() -> Config {
    Config::with_authorize_url(
        "b2-rust-test",
        Duration::from_secs(5),
        &FakeServer::authorize_url(),
    )
    .expect("fake server authorize URL is valid")
}

/// Returns a server for the test account and bucket.
pub fn server() -> FakeServer {
    FakeServer::new(&credentials(), &bucket())
}

/// Returns a client of the test account and bucket which sends the requests to `server`.
pub fn client(server: &FakeServer) -> Client<&FakeServer> {
    Client::with_http_client(credentials(), bucket(), &config(), server)
}

/// Returns a client configured with `account_id` and `bucket_id` which sends the requests to
/// `server`.
pub fn client_with<'a>(
    server: &'a FakeServer,
    account_id: &str,
    bucket_id: &str,
) -> Client<&'a FakeServer> {
    Client::with_http_client(
        Credentials::new(account_id, APPLICATION_KEY),
        Bucket::new(bucket_id, BUCKET_NAME),
        &config(),
        server,
    )
}
