//! # Pointstracker Core Library
//!
//! This library provides the core logic for a shared household points tracker.
//! Named counters hold signed scores; large changes inside a rolling five
//! minute window must be approved with a PIN, and big changes send an SMS
//! notification through email-to-SMS carrier gateways.
//!
//! The `pointstracker` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Gate**: Pure threshold check over the per-counter change history
//! - **Tracker**: The state context; persists every mutation before committing it
//! - **Stores**: Whole-document persistence (local SQLite, REST, Firestore)
//! - **Notify**: Payload building and dispatch to the configured alert channel
//! - **Storage**: TOML configuration and the local SQLite key-value database
//!
//! ## Key Components
//!
//! - [`PointsTracker`]: Orchestrates point changes, PIN challenges and admin settings
//! - [`AppState`]: The shared state document
//! - [`StateRepository`]: Trait implemented by every store
//! - [`Notifier`]: Trait implemented by every alert channel
//! - [`Config`]: Application configuration management

pub mod admin;
pub mod carriers;
pub mod error;
pub mod events;
pub mod gate;
pub mod history;
pub mod notify;
pub mod security;
pub mod state;
pub mod storage;
pub mod store;
pub mod tracker;

pub use admin::RecipientField;
pub use error::{
    AuthError, ConfigError, CoreError, DatabaseError, GateError, NotifyError, StoreError,
    ValidationError,
};
pub use events::{Event, Setting};
pub use gate::{Decision, GateState, PendingChange};
pub use history::{ChangeHistory, PointChange, WINDOW_MS};
pub use notify::{NotificationPayload, NotificationStatus, Notifier};
pub use state::{AppState, NotificationConfig, StateDocument};
pub use storage::{BackendKind, Config, Database};
pub use store::{AlertChannel, Backend, StateRepository};
pub use tracker::{PointsTracker, Session};
