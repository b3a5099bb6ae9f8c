//! Gating engine: decides whether a point change needs PIN approval.
//!
//! ## State Transitions
//!
//! ```text
//! Evaluating -> Applied
//! Evaluating -> Challenging -> (Applied | Cancelled)
//!                    ^    |
//!                    +----+  wrong PIN
//! ```
//!
//! The engine itself is pure; persistence and notification happen in
//! [`crate::tracker::PointsTracker`].

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::history::{ChangeHistory, PointChange};

/// Outcome of evaluating a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Apply immediately.
    Apply { cumulative: u64, projected: u64 },
    /// Window would exceed the threshold; PIN required.
    Challenge { cumulative: u64, projected: u64 },
}

impl Decision {
    pub fn requires_pin(&self) -> bool {
        matches!(self, Decision::Challenge { .. })
    }
}

/// Evaluate a change against the counter's window and the threshold.
///
/// Exactly reaching the threshold does not challenge.
pub fn evaluate(
    history: &ChangeHistory,
    counter: &str,
    amount: i64,
    threshold: u32,
    now_ms: i64,
) -> Decision {
    let cumulative = history.cumulative_change(counter, now_ms);
    let projected = cumulative.saturating_add(amount.unsigned_abs());
    if projected > u64::from(threshold) {
        Decision::Challenge {
            cumulative,
            projected,
        }
    } else {
        Decision::Apply {
            cumulative,
            projected,
        }
    }
}

/// A change waiting for PIN approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub counter: String,
    pub amount: i64,
    /// When the change was requested (ms since epoch).
    pub timestamp: i64,
}

impl PendingChange {
    /// History recorded on approval: only this change, at request time.
    pub fn approved_history(&self) -> Vec<PointChange> {
        vec![PointChange::new(self.amount, self.timestamp)]
    }
}

/// The single pending-challenge slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Evaluating,
    Challenging { pending: PendingChange },
}

impl GateState {
    pub fn pending(&self) -> Option<&PendingChange> {
        match self {
            GateState::Evaluating => None,
            GateState::Challenging { pending } => Some(pending),
        }
    }

    /// Fail if a challenge is already open.
    pub fn ensure_idle(&self) -> Result<(), GateError> {
        match self {
            GateState::Evaluating => Ok(()),
            GateState::Challenging { pending } => Err(GateError::ChallengePending {
                counter: pending.counter.clone(),
                amount: pending.amount,
            }),
        }
    }

    pub fn open(&mut self, pending: PendingChange) {
        *self = GateState::Challenging { pending };
    }

    /// Close the slot, returning what was pending.
    pub fn take(&mut self) -> Result<PendingChange, GateError> {
        match std::mem::take(self) {
            GateState::Challenging { pending } => Ok(pending),
            GateState::Evaluating => Err(GateError::NoPendingChallenge),
        }
    }
}
