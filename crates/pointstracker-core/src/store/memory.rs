//! In-process store, for embedding and tests.

use std::cell::{Cell, RefCell};

use super::StateRepository;
use crate::error::StoreError;
use crate::state::{AppState, StateDocument};

/// Keeps the last saved document in memory. Can be switched into a failing
/// mode to exercise unreachable-store paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Option<StateDocument>>,
    saves: Cell<usize>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: StateDocument) -> Self {
        let store = Self::default();
        store.document.replace(Some(document));
        store
    }

    /// Make every load and save fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn document(&self) -> Option<StateDocument> {
        self.document.borrow().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            Err(StoreError::Status {
                backend: "memory",
                status: 503,
                body: "store unavailable".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl StateRepository for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        self.check()?;
        Ok(self.document())
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        self.check()?;
        self.document.replace(Some(StateDocument::from(state.clone())));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
