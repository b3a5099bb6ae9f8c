//! Local backend: the state document as JSON in the SQLite kv table.

use super::StateRepository;
use crate::error::StoreError;
use crate::state::{AppState, StateDocument};
use crate::storage::Database;

const STATE_KEY: &str = "app_state";

pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    /// Open the store in the data directory.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open()?))
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl StateRepository for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        match self.db.kv_get(STATE_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StoreError::Malformed(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state).map_err(|e| StoreError::Malformed(e.to_string()))?;
        self.db.kv_set(STATE_KEY, &json)?;
        Ok(())
    }
}
