//! The application-state context.
//!
//! [`PointsTracker`] owns the current [`AppState`], the pending-challenge slot,
//! the admin session flag and the recipient draft, and is the only place
//! where any of them change.
//!
//! Persistence rule: a mutation builds the next state, writes it to the store,
//! and only then replaces the in-memory state. A failed write returns the
//! error and leaves everything as it was. Notifications go out after the
//! write and cannot undo it.

use serde::{Deserialize, Serialize};

use crate::admin::{self, RecipientField};
use crate::error::{AuthError, CoreError, GateError, StoreError, ValidationError};
use crate::events::{timestamp, Event, Setting};
use crate::gate::{self, Decision, GateState, PendingChange};
use crate::history::PointChange;
use crate::notify::{self, Notifier};
use crate::security;
use crate::state::{AppState, NotificationConfig};
use crate::store::StateRepository;

pub const INCORRECT_PIN_MESSAGE: &str = "Incorrect PIN. Try again.";

/// Per-user session data that outlives a single CLI invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub gate: GateState,
    #[serde(default)]
    pub admin_logged_in: bool,
}

pub struct PointsTracker<S, N> {
    store: S,
    notifier: N,
    state: AppState,
    gate: GateState,
    admin_logged_in: bool,
    recipient_draft: Vec<NotificationConfig>,
    loaded_from_defaults: bool,
}

impl<S: StateRepository, N: Notifier> PointsTracker<S, N> {
    /// Load the shared state, falling back to defaults if the store is
    /// unreachable. A missing document is seeded with the defaults.
    pub async fn load(store: S, notifier: N, counters: &[String]) -> Self {
        let defaults = AppState::defaults(counters.iter().cloned());
        let mut tracker = Self {
            store,
            notifier,
            recipient_draft: defaults.notifications.clone(),
            state: defaults,
            gate: GateState::default(),
            admin_logged_in: false,
            loaded_from_defaults: false,
        };

        match tracker.store.load().await {
            Ok(Some(doc)) => {
                tracker.set_state(AppState::from_document(doc, counters.iter().cloned()));
                tracing::info!(store = tracker.store.name(), "state loaded");
            }
            Ok(None) => {
                tracing::info!(store = tracker.store.name(), "no state document, seeding defaults");
                if let Err(e) = tracker.store.save(&tracker.state).await {
                    tracing::warn!(error = %e, "failed to seed default state");
                }
            }
            Err(e) => {
                tracing::error!(
                    store = tracker.store.name(),
                    error = %e,
                    "failed to load state, using defaults"
                );
                tracker.loaded_from_defaults = true;
            }
        }
        tracker
    }

    fn set_state(&mut self, state: AppState) {
        self.recipient_draft = state.notifications.clone();
        self.state = state;
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// True when the store could not be read at startup.
    pub fn loaded_from_defaults(&self) -> bool {
        self.loaded_from_defaults
    }

    pub fn pending(&self) -> Option<&PendingChange> {
        self.gate.pending()
    }

    pub fn is_admin(&self) -> bool {
        self.admin_logged_in
    }

    pub fn session(&self) -> Session {
        Session {
            gate: self.gate.clone(),
            admin_logged_in: self.admin_logged_in,
        }
    }

    pub fn restore_session(&mut self, session: Session) {
        self.gate = session.gate;
        self.admin_logged_in = session.admin_logged_in;
    }

    fn resolve_counter(&self, name: &str) -> Result<String, ValidationError> {
        self.state
            .resolve_counter(name)
            .map(str::to_string)
            .ok_or_else(|| ValidationError::UnknownCounter(name.to_string()))
    }

    async fn commit(&mut self, next: AppState) -> Result<(), StoreError> {
        self.store.save(&next).await?;
        self.state = next;
        Ok(())
    }

    // ── Points ───────────────────────────────────────────────────────

    /// Request a signed change to a counter.
    ///
    /// Applies it directly, or raises a PIN challenge when the 5 minute
    /// cumulative change would exceed the threshold. Raising a challenge
    /// clears the counter's history immediately, whatever happens next.
    pub async fn change_points(
        &mut self,
        counter: &str,
        amount: i64,
        now_ms: i64,
    ) -> Result<Event, CoreError> {
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        self.gate.ensure_idle()?;
        let counter = self.resolve_counter(counter)?;
        let threshold = self.state.pin_threshold;

        match gate::evaluate(&self.state.change_history, &counter, amount, threshold, now_ms) {
            Decision::Challenge { cumulative, projected } => {
                let mut next = self.state.clone();
                next.change_history.reset(&counter);
                self.commit(next).await?;
                self.gate.open(PendingChange {
                    counter: counter.clone(),
                    amount,
                    timestamp: now_ms,
                });
                tracing::info!(%counter, amount, projected, threshold, "PIN challenge raised");
                Ok(Event::ChallengeRaised {
                    counter,
                    amount,
                    cumulative,
                    threshold,
                    at: timestamp(now_ms),
                })
            }
            Decision::Apply { .. } => {
                let entries = self.state.change_history.append_and_prune(
                    &counter,
                    PointChange::new(amount, now_ms),
                    now_ms,
                );
                self.apply(counter, amount, entries, now_ms, false).await
            }
        }
    }

    /// Answer the pending challenge.
    ///
    /// A wrong PIN is not an error: it yields [`Event::PinRejected`] and the
    /// pending change stays open for another try.
    pub async fn submit_pin(&mut self, pin: &str, now_ms: i64) -> Result<Event, CoreError> {
        let pending = self
            .gate
            .pending()
            .cloned()
            .ok_or(GateError::NoPendingChallenge)?;

        if !security::verify_pin(pin, &self.state.current_pin) {
            tracing::info!(counter = %pending.counter, "incorrect PIN");
            return Ok(Event::PinRejected {
                counter: pending.counter,
                amount: pending.amount,
                message: INCORRECT_PIN_MESSAGE.to_string(),
            });
        }

        let history = pending.approved_history();
        let event = self
            .apply(pending.counter, pending.amount, history, now_ms, true)
            .await?;
        self.gate = GateState::Evaluating;
        Ok(event)
    }

    /// Drop the pending change. The counter's history stays cleared.
    pub fn cancel_challenge(&mut self) -> Result<Event, GateError> {
        let pending = self.gate.take()?;
        tracing::info!(counter = %pending.counter, amount = pending.amount, "challenge cancelled");
        Ok(Event::ChallengeCancelled {
            counter: pending.counter,
            amount: pending.amount,
        })
    }

    async fn apply(
        &mut self,
        counter: String,
        amount: i64,
        history: Vec<PointChange>,
        now_ms: i64,
        approved_with_pin: bool,
    ) -> Result<Event, CoreError> {
        let mut next = self.state.clone();
        let slot = next.scores.entry(counter.clone()).or_insert(0);
        *slot = slot.saturating_add(amount);
        let score = *slot;
        next.change_history.replace(&counter, history);
        self.commit(next).await?;
        tracing::info!(%counter, amount, score, approved_with_pin, "points applied");

        let notification = notify::dispatch_change(
            &self.notifier,
            &counter,
            amount,
            &self.state.notifications,
            now_ms,
        )
        .await;

        Ok(Event::PointsApplied {
            counter,
            amount,
            score,
            approved_with_pin,
            notification,
            at: timestamp(now_ms),
        })
    }

    // ── Admin ────────────────────────────────────────────────────────

    pub fn admin_login(&mut self, password: &str) -> Result<Event, AuthError> {
        let attempt = password.trim();
        if attempt.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        if !security::verify_admin_password(attempt, &self.state.admin_pass_hash) {
            return Err(AuthError::IncorrectPassword);
        }
        self.admin_logged_in = true;
        self.recipient_draft = self.state.notifications.clone();
        Ok(Event::AdminLoggedIn {
            current_pin: self.state.current_pin.clone(),
        })
    }

    /// The approval PIN, visible to a logged-in admin only.
    pub fn current_pin(&self) -> Result<&str, AuthError> {
        self.require_admin()?;
        Ok(&self.state.current_pin)
    }

    pub fn admin_logout(&mut self) -> Event {
        self.admin_logged_in = false;
        Event::AdminLoggedOut
    }

    fn require_admin(&self) -> Result<(), AuthError> {
        if self.admin_logged_in {
            Ok(())
        } else {
            Err(AuthError::NotLoggedIn)
        }
    }

    pub async fn update_pin(&mut self, input: &str) -> Result<Event, CoreError> {
        self.require_admin()?;
        let pin = admin::validate_pin(input)?;
        let mut next = self.state.clone();
        next.current_pin = pin;
        self.commit(next).await?;
        Ok(Event::SettingsUpdated {
            setting: Setting::Pin,
            message: "PIN updated successfully!".into(),
        })
    }

    /// Store the new password's hash and end the admin session.
    pub async fn update_admin_password(&mut self, input: &str) -> Result<Event, CoreError> {
        self.require_admin()?;
        let password = admin::validate_new_password(input)?;
        let mut next = self.state.clone();
        next.admin_pass_hash = security::hash_password(&password);
        self.commit(next).await?;
        self.admin_logged_in = false;
        Ok(Event::SettingsUpdated {
            setting: Setting::AdminPassword,
            message: "Admin Password updated successfully! Please re-login.".into(),
        })
    }

    pub async fn update_threshold(&mut self, input: &str) -> Result<Event, CoreError> {
        self.require_admin()?;
        let threshold = admin::parse_threshold(input)?;
        let mut next = self.state.clone();
        next.pin_threshold = threshold;
        self.commit(next).await?;
        Ok(Event::SettingsUpdated {
            setting: Setting::Threshold,
            message: format!("Threshold updated to {threshold} pts successfully!"),
        })
    }

    pub fn recipient_draft(&self) -> &[NotificationConfig] {
        &self.recipient_draft
    }

    /// Edit the in-memory recipient draft. Nothing is persisted.
    pub fn edit_recipient(
        &mut self,
        index: usize,
        field: RecipientField,
        value: &str,
    ) -> Result<(), CoreError> {
        self.require_admin()?;
        admin::edit_recipient(&mut self.recipient_draft, index, field, value)?;
        Ok(())
    }

    /// Persist the draft: complete records only, padded to five slots.
    pub async fn save_recipients(&mut self) -> Result<Event, CoreError> {
        self.require_admin()?;
        let saved = admin::normalize_recipients(&self.recipient_draft);
        let mut next = self.state.clone();
        next.notifications = saved.clone();
        self.commit(next).await?;
        self.recipient_draft = saved;
        Ok(Event::SettingsUpdated {
            setting: Setting::Notifications,
            message: "Notification settings saved successfully!".into(),
        })
    }
}
