//! Minimal and safe Rust client for the Backblaze B2 native API.
//!
//! The [`Client`] uploads, downloads and deletes files of a single bucket. Every public operation
//! authorizes the account from scratch, so the client holds no state between calls besides the
//! immutable credentials and bucket reference it was created with.
//!
//! See the [implementation design documentation](crate::docs::design).

#![deny(missing_docs)]

pub(crate) mod client;
pub(crate) mod config;
pub(crate) mod session;
pub(crate) mod validate;

pub mod api;
pub mod error;
#[cfg(feature = "fake")]
pub mod fake;
pub mod http;

/// Documentation about how this crate is implemented.
pub mod docs {
    pub mod design;
}

pub use client::Client;
pub use config::{Bucket, Config, Credentials, DEFAULT_AUTHORIZE_URL};
pub use error::Error;

/// A specialized [`Result`](https://doc.rust-lang.org/std/result/enum.Result.html)
/// type for B2 operations.
///
/// This type is broadly used across this crate for any operations which may
/// produce an error.
pub type Result<T> = std::result::Result<T, error::Error>;
