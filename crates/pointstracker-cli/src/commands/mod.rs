pub mod admin;
pub mod carriers;
pub mod config;
pub mod points;
pub mod status;

use pointstracker_core::storage::Database;
use pointstracker_core::{AlertChannel, Backend, Config, CoreError, Event, PointsTracker, Session};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

const SESSION_KEY: &str = "cli_session";

/// The tracker plus the local database holding the CLI session between runs.
pub struct Context {
    pub tracker: PointsTracker<Backend, AlertChannel>,
    db: Database,
}

impl Context {
    pub async fn open() -> Result<Self, CoreError> {
        let config = Config::load()?;
        config.validate()?;
        let backend = Backend::from_config(&config)?;
        let channel = AlertChannel::from_config(&config)?;
        let mut tracker = PointsTracker::load(backend, channel, &config.tracker.counters).await;
        if tracker.loaded_from_defaults() {
            eprintln!("warning: could not load shared state, showing defaults");
        }

        let db = Database::open()?;
        if let Some(session) = db.get_json::<Session>(SESSION_KEY)? {
            tracker.restore_session(session);
        }
        Ok(Self { tracker, db })
    }

    pub fn save_session(&self) -> CliResult {
        self.db.set_json(SESSION_KEY, &self.tracker.session())?;
        Ok(())
    }
}

pub fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
