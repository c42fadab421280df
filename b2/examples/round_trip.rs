//! Uploads, downloads, verifies and deletes a small file against a real bucket.
//!
//! It reads the account and bucket from a JSON file whose path is the first argument (by default
//! `b2-example.json`):
//!
//! ```json
//! {
//!   "account-id": "...",
//!   "application-key": "...",
//!   "bucket-id": "...",
//!   "bucket-name": "..."
//! }
//! ```
//!
//! Run it with `RUST_LOG=b2=debug` to see every request.

use std::error::Error;
use std::{env, fs, process};

use b2::{Bucket, Client, Config, Credentials};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Settings {
    account_id: String,
    application_key: String,
    bucket_id: String,
    bucket_name: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("FAILURE: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("b2-example.json"));
    let settings: Settings = serde_json::from_str(&fs::read_to_string(&path)?)?;

    let client = Client::new(
        Credentials::new(&settings.account_id, &settings.application_key),
        Bucket::new(&settings.bucket_id, &settings.bucket_name),
        &Config::default(),
    )?;

    let data = b"hello world";

    let id = client.upload("testing.txt", data)?;
    println!("OK: uploaded file.");

    let download = client.download(&id)?;
    println!("OK: downloaded file.");

    if download != data {
        return Err("downloaded data didn't match".into());
    }
    println!("OK: data uploaded/downloaded fine.");

    client.delete(&id)?;
    println!("OK: deleted file.");

    Ok(())
}
