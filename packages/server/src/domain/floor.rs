//! Floor Controller
//!
//! 発言権（floor）の排他制御を行う状態機械。
//!
//! ```text
//!            request(A)               release(A) / timeout / disconnect(A)
//!   Idle ──────────────────▶ Held(A) ─────────────────────────────────────▶ Idle
//!                             │  ▲
//!                             └──┘ request(A): renewal (deadline reset)
//!                             request(B): denied(busy), no change
//! ```
//!
//! The controller owns the single timer slot. Every hold change goes through
//! cancel-then-arm, so at most one expiry timer is outstanding at any time.

use std::time::Duration;

use tokio::time::Instant;

use super::value_object::ClientId;

/// Identifies one specific hold. A renewal produces a new generation, so an
/// expiry armed for an older hold can be recognised and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldToken {
    pub holder: ClientId,
    pub generation: u64,
}

/// A scheduled expiry that has not been cancelled yet.
pub trait ArmedTimer: Send {
    fn cancel(self: Box<Self>);
}

/// Schedules the one-shot expiry of a hold.
///
/// When the delay elapses the implementation must hand `hold` back to
/// [`FloorController::on_timeout`] (through whatever plumbing it uses).
pub trait FloorTimer: Send + Sync {
    fn arm(&self, hold: HoldToken, after: Duration) -> Box<dyn ArmedTimer>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorState {
    Idle,
    Held { holder: ClientId, deadline: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Busy,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Busy => "busy",
        }
    }
}

/// Result of a floor request, addressed to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorDecision {
    /// Idle → Held(requester)
    Granted,
    /// Held(requester) → Held(requester) with a fresh deadline
    Renewed,
    /// Held(other), unchanged
    Denied { holder: ClientId, reason: DenyReason },
}

/// Read-only view of the floor for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorStatus {
    pub holder: Option<ClientId>,
    pub remaining: Option<Duration>,
}

pub struct FloorController {
    state: FloorState,
    hold_duration: Duration,
    generation: u64,
    timer: Box<dyn FloorTimer>,
    armed: Option<Box<dyn ArmedTimer>>,
}

impl FloorController {
    pub const DEFAULT_HOLD_DURATION: Duration = Duration::from_secs(30);

    pub fn new(hold_duration: Duration, timer: Box<dyn FloorTimer>) -> Self {
        Self {
            state: FloorState::Idle,
            hold_duration,
            generation: 0,
            timer,
            armed: None,
        }
    }

    pub fn state(&self) -> &FloorState {
        &self.state
    }

    pub fn holder(&self) -> Option<&ClientId> {
        match &self.state {
            FloorState::Idle => None,
            FloorState::Held { holder, .. } => Some(holder),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            FloorState::Idle => None,
            FloorState::Held { deadline, .. } => Some(*deadline),
        }
    }

    pub fn hold_duration(&self) -> Duration {
        self.hold_duration
    }

    pub fn has_pending_timer(&self) -> bool {
        self.armed.is_some()
    }

    pub fn status(&self, now: Instant) -> FloorStatus {
        FloorStatus {
            holder: self.holder().cloned(),
            remaining: self
                .deadline()
                .map(|deadline| deadline.saturating_duration_since(now)),
        }
    }

    /// Handle a floor request from `requester`.
    pub fn request(&mut self, requester: &ClientId, now: Instant) -> FloorDecision {
        match &self.state {
            FloorState::Idle => {
                self.start_hold(requester.clone(), now);
                FloorDecision::Granted
            }
            FloorState::Held { holder, .. } if holder == requester => {
                self.start_hold(requester.clone(), now);
                FloorDecision::Renewed
            }
            FloorState::Held { holder, .. } => FloorDecision::Denied {
                holder: holder.clone(),
                reason: DenyReason::Busy,
            },
        }
    }

    /// Release the floor if `requester` holds it. Returns whether anything changed.
    pub fn release(&mut self, requester: &ClientId) -> bool {
        if self.holder() != Some(requester) {
            return false;
        }
        self.clear();
        true
    }

    /// Apply an expiry. Stale tokens (released, renewed or superseded holds)
    /// are ignored. Returns the prior holder when the floor actually expired.
    pub fn on_timeout(&mut self, hold: &HoldToken) -> Option<ClientId> {
        match &self.state {
            FloorState::Held { holder, .. }
                if *holder == hold.holder && self.generation == hold.generation =>
            {
                let prior = holder.clone();
                self.clear();
                Some(prior)
            }
            _ => None,
        }
    }

    /// Same transition as [`release`](Self::release); the caller must not
    /// notify the disconnected participant.
    pub fn on_disconnect(&mut self, participant: &ClientId) -> bool {
        self.release(participant)
    }

    fn start_hold(&mut self, holder: ClientId, now: Instant) {
        self.cancel_timer();
        self.generation += 1;
        let token = HoldToken {
            holder: holder.clone(),
            generation: self.generation,
        };
        self.state = FloorState::Held {
            holder,
            deadline: now + self.hold_duration,
        };
        self.armed = Some(self.timer.arm(token, self.hold_duration));
    }

    fn clear(&mut self) {
        self.cancel_timer();
        self.state = FloorState::Idle;
    }

    fn cancel_timer(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.cancel();
        }
    }
}

impl std::fmt::Debug for FloorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorController")
            .field("state", &self.state)
            .field("hold_duration", &self.hold_duration)
            .field("generation", &self.generation)
            .field("timer_pending", &self.armed.is_some())
            .finish()
    }
}
