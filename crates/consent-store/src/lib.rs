//! Consent store implementations.

mod memory;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use consent_types::{ConsentRecord, ConsentStore, StoreError};
pub use memory::InMemoryConsentStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConsentStore;
