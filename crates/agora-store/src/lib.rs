//! # agora-store
//!
//! Local persisted storage for the Agora client, backed by SQLite.
//!
//! The store plays the role of the device's key-value storage: it keeps the
//! signed-in user's session between runs. [`Database`] is a synchronous
//! handle with typed key-value helpers; [`SqliteSessionStore`] adapts it to
//! the async [`agora_shared::ports::SessionStore`] port.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod session;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use session::SqliteSessionStore;
