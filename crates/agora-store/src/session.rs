//! [`SessionStore`] adapter over the local database.
//!
//! The session is kept as two entries, mirroring what the mobile client
//! wrote to device storage: a `"true"` login flag and a JSON blob with the
//! user's id and name. Every call goes to SQLite; nothing is cached.

use std::path::Path;
use std::sync::{Arc, Mutex};

use agora_shared::constants::{SESSION_KEY_LOGGED_IN, SESSION_KEY_USER_DATA};
use agora_shared::ports::SessionStore;
use agora_shared::{SessionRecord, StorageError, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::database::Database;
use crate::error::{Result, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct UserData {
    id: Option<UserId>,
    #[serde(alias = "nome")]
    name: Option<String>,
}

/// Session persistence backed by [`Database`].
#[derive(Clone)]
pub struct SqliteSessionStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteSessionStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open the database at `path` and wrap it.
    pub fn open_at(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open_at(path)?))
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let guard = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&guard)
    }

    fn read_record(&self) -> Result<SessionRecord> {
        self.with_db(|db| {
            let is_logged_in = db.get_value(SESSION_KEY_LOGGED_IN)?.as_deref() == Some("true");
            let user = match db.get_value(SESSION_KEY_USER_DATA)? {
                Some(json) => Some(serde_json::from_str::<UserData>(&json)?),
                None => None,
            };

            Ok(SessionRecord {
                is_logged_in,
                user_id: user.as_ref().and_then(|u| u.id),
                user_name: user.and_then(|u| u.name),
            })
        })
    }

    fn write_record(&self, record: &SessionRecord) -> Result<()> {
        let user_json = serde_json::to_string(&UserData {
            id: record.user_id,
            name: record.user_name.clone(),
        })?;

        self.with_db(|db| {
            db.conn().execute_batch("BEGIN")?;
            let written = db
                .set_value(SESSION_KEY_USER_DATA, &user_json)
                .and_then(|_| {
                    db.set_value(
                        SESSION_KEY_LOGGED_IN,
                        if record.is_logged_in { "true" } else { "false" },
                    )
                });
            match written {
                Ok(()) => {
                    db.conn().execute_batch("COMMIT")?;
                    Ok(())
                }
                Err(e) => {
                    let _ = db.conn().execute_batch("ROLLBACK");
                    Err(e)
                }
            }
        })
    }

    fn clear_record(&self) -> Result<()> {
        self.with_db(|db| {
            db.remove_value(SESSION_KEY_USER_DATA)?;
            db.remove_value(SESSION_KEY_LOGGED_IN)?;
            Ok(())
        })
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn read(&self) -> std::result::Result<SessionRecord, StorageError> {
        let record = self.read_record()?;
        debug!(
            logged_in = record.is_logged_in,
            has_user = record.user_id.is_some(),
            "session read"
        );
        Ok(record)
    }

    async fn write(&self, record: &SessionRecord) -> std::result::Result<(), StorageError> {
        self.write_record(record)?;
        info!(user = ?record.user_id, "session stored");
        Ok(())
    }

    async fn clear(&self) -> std::result::Result<(), StorageError> {
        self.clear_record()?;
        info!("session cleared");
        Ok(())
    }
}
