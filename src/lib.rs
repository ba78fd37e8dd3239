//! Embedded document store that keeps every record in its own JSON file.
//!
//! Records live at `<root>/<collection>/<resource>.json`. Writes and deletes
//! are serialized per collection, and every write goes through a temp file
//! plus rename so a reader never sees a half-written record.
//!
//! ```rust,no_run
//! use json_cabinet::Cabinet;
//!
//! let db = Cabinet::open("./data").unwrap();
//! db.write("users", "pam", &serde_json::json!({ "age": 28 })).unwrap();
//! let pam: serde_json::Value = db.read("users", "pam").unwrap();
//! ```
//!
//! **Single-process only.** The per-collection locks live in memory. Two
//! processes (or two `Cabinet`s) over the same root do not exclude each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod logger;
pub mod paths;
pub mod persist;
pub mod registry;
pub mod serializer;
pub mod store;

pub use error::{Error, Result};
pub use logger::{ConsoleLogger, Level, Logger, NullLogger};
pub use registry::{CollectionLock, LockRegistry};
pub use serializer::{JsonSerializer, Serializer};
pub use store::{Cabinet, CabinetBuilder, Options};

/// Default lock registry: one `parking_lot` mutex around a `HashMap`.
pub type DefaultRegistry =
    parking_lot::Mutex<std::collections::HashMap<String, registry::CollectionLock>>;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
