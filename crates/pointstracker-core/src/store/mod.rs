//! State repositories.
//!
//! A repository holds the single shared state document and offers only
//! whole-document reads and writes; writes are last-write-wins.
//!
//! The backend is chosen at runtime from [`crate::storage::Config`]:
//! [`Backend`] dispatches to the selected repository and [`AlertChannel`]
//! to the matching notification collaborator.

pub mod firestore;
pub mod local;
pub mod memory;
pub mod rest;

pub use firestore::FirestoreStore;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use rest::RestStore;

use crate::error::{NotifyError, StoreError};
use crate::notify::{LogNotifier, NotificationPayload, Notifier, RestNotifier};
use crate::state::{AppState, StateDocument};
use crate::storage::{BackendKind, Config};

/// Full-document persistence.
#[allow(async_fn_in_trait)]
pub trait StateRepository {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Read the document. `Ok(None)` when it does not exist yet.
    async fn load(&self) -> Result<Option<StateDocument>, StoreError>;

    /// Overwrite the document with `state`.
    async fn save(&self, state: &AppState) -> Result<(), StoreError>;
}

/// The runtime-selected state repository.
pub enum Backend {
    Local(LocalStore),
    Rest(RestStore),
    Firestore(FirestoreStore),
}

impl Backend {
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        Ok(match config.backend.kind {
            BackendKind::Local => Backend::Local(LocalStore::open()?),
            BackendKind::Rest => Backend::Rest(RestStore::new(&config.rest)?),
            BackendKind::Firestore => Backend::Firestore(FirestoreStore::new(&config.firestore)?),
        })
    }
}

impl StateRepository for Backend {
    fn name(&self) -> &str {
        match self {
            Backend::Local(s) => s.name(),
            Backend::Rest(s) => s.name(),
            Backend::Firestore(s) => StateRepository::name(s),
        }
    }

    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        match self {
            Backend::Local(s) => s.load().await,
            Backend::Rest(s) => s.load().await,
            Backend::Firestore(s) => s.load().await,
        }
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        match self {
            Backend::Local(s) => s.save(state).await,
            Backend::Rest(s) => s.save(state).await,
            Backend::Firestore(s) => s.save(state).await,
        }
    }
}

/// The notification collaborator matching the selected backend.
pub enum AlertChannel {
    Log(LogNotifier),
    Rest(RestNotifier),
    Firestore(FirestoreStore),
}

impl AlertChannel {
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        Ok(match config.backend.kind {
            BackendKind::Local => AlertChannel::Log(LogNotifier),
            BackendKind::Rest => AlertChannel::Rest(RestNotifier::new(&config.rest)?),
            BackendKind::Firestore => {
                AlertChannel::Firestore(FirestoreStore::new(&config.firestore)?)
            }
        })
    }
}

impl Notifier for AlertChannel {
    fn name(&self) -> &str {
        match self {
            AlertChannel::Log(n) => n.name(),
            AlertChannel::Rest(n) => n.name(),
            AlertChannel::Firestore(n) => Notifier::name(n),
        }
    }

    fn delivers(&self) -> bool {
        match self {
            AlertChannel::Log(n) => n.delivers(),
            AlertChannel::Rest(n) => n.delivers(),
            AlertChannel::Firestore(n) => n.delivers(),
        }
    }

    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        match self {
            AlertChannel::Log(n) => n.dispatch(payload).await,
            AlertChannel::Rest(n) => n.dispatch(payload).await,
            AlertChannel::Firestore(n) => n.dispatch(payload).await,
        }
    }
}
