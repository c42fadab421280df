//! Backblaze B2 file storage engine for hosts with pluggable storage backends.
//!
//! [`B2Engine`] implements the [`StorageEngine`] interface on top of the [`b2`] client. It's
//! configured through four host [settings](settings::OPTIONS) and stores each file under a
//! random [hierarchical name](name::generate_file_name).

#![deny(missing_docs)]

pub(crate) mod engine;

pub mod name;
pub mod settings;

pub use b2::{Error, Result};
pub use engine::{B2Engine, StorageEngine};
pub use settings::Settings;
