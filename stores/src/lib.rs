//! Configuration stores for `fibre_config`.
//!
//! - [`FileStore`]: sections as top-level mappings of a YAML file.
//! - [`TableStore`]: sections as `(section, name, value)` rows of an [`EntryTable`].
//! - [`StoreConfig`]: picks and opens one of the above from a YAML description.
//!
//! All of them implement [`fibre_config::ConfigurationStore`], so they plug
//! straight into a [`fibre_config::Binder`]. Writes upsert: an existing key is
//! matched case-insensitively and updated in place, a new key is appended.

mod config;
mod error;
mod file;
mod table;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use file::{FileStore, FileStoreBuilder};
pub use table::{ConfigurationEntry, EntryTable, TableStore, VecTable};
