//! Replay scheduling for time sequences.
//!
//! An [`Animator`] never sleeps or spawns anything. It hands out [`Wakeup`]
//! requests that the host turns into a timer or an animation-frame callback,
//! and reacts when the host calls [`Animator::fire`] with the token it got.
//! At most one request is pending; scheduling a new one or cancelling makes
//! every older token stale.

use crate::options::ReplayMode;
use std::time::Duration;

/// Pauses shorter than this are replaced by [`FALLBACK_SLEEP`].
pub const MIN_SLEEP: Duration = Duration::from_millis(100);

/// Pause used when the stored one is too short.
pub const FALLBACK_SLEEP: Duration = Duration::from_millis(10);

/// Kind of callback the host should arrange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeupKind {
    /// Timer after a delay.
    Timer(Duration),
    /// Next animation frame.
    Frame,
}

/// Request for exactly one callback, identified by `token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    /// Token to pass back to [`Animator::fire`].
    pub token: u64,
    /// What to wait for.
    pub kind: WakeupKind,
}

/// Life-cycle state of an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// Not started.
    #[default]
    Idle,
    /// A wakeup is pending.
    Running,
    /// All steps played.
    Finished,
    /// Stopped by the host.
    Cancelled,
}

/// Result of [`Animator::fire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The token was not the pending one; nothing to do.
    Stale,
    /// A pause elapsed; wait for the next frame before drawing.
    Wait(Wakeup),
    /// Draw `step` now, then arrange `next` if any.
    Draw {
        /// Step index to draw.
        step: usize,
        /// Following wakeup, `None` when the replay is over.
        next: Option<Wakeup>,
    },
}

/// Step sequencer with a single pending wakeup.
#[derive(Debug, Clone)]
pub struct Animator {
    steps: usize,
    mode: ReplayMode,
    sleep: Duration,
    repeat_sleep: Duration,
    step: usize,
    state: AnimationState,
    pending: Option<Wakeup>,
    next_token: u64,
}

impl Animator {
    /// Sequencer over `steps` steps pausing `sleep_ms` between them. A
    /// repeating replay restarts after `max(min_repeat_sleep, 5 * sleep)`.
    #[must_use]
    pub fn new(steps: usize, sleep_ms: u64, mode: ReplayMode, min_repeat_sleep: Duration) -> Self {
        let mut sleep = Duration::from_millis(sleep_ms);
        if sleep < MIN_SLEEP {
            sleep = FALLBACK_SLEEP;
        }
        Self {
            steps,
            mode,
            sleep,
            repeat_sleep: min_repeat_sleep.max(sleep * 5),
            step: 0,
            state: AnimationState::Idle,
            pending: None,
            next_token: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Pending wakeup, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Wakeup> {
        self.pending
    }

    /// Effective pause between steps.
    #[must_use]
    pub fn sleep(&self) -> Duration {
        self.sleep
    }

    /// Pause before a repeating replay restarts.
    #[must_use]
    pub fn repeat_sleep(&self) -> Duration {
        self.repeat_sleep
    }

    fn schedule(&mut self, kind: WakeupKind) -> Wakeup {
        self.next_token += 1;
        let wakeup = Wakeup { token: self.next_token, kind };
        self.pending = Some(wakeup);
        self.state = AnimationState::Running;
        wakeup
    }

    fn finish(&mut self) {
        self.pending = None;
        self.state = AnimationState::Finished;
    }

    /// Start (or restart) from the first step, replacing any pending wakeup.
    pub fn start(&mut self) -> Option<Wakeup> {
        self.step = 0;
        if self.steps == 0 {
            self.finish();
            return None;
        }
        Some(self.schedule(WakeupKind::Frame))
    }

    /// Drop the pending wakeup; its token becomes stale.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() || self.state == AnimationState::Idle {
            self.state = AnimationState::Cancelled;
        }
    }

    /// Host callback for the wakeup with `token`.
    pub fn fire(&mut self, token: u64) -> Tick {
        let Some(pending) = self.pending.filter(|p| p.token == token) else {
            return Tick::Stale;
        };
        if let WakeupKind::Timer(_) = pending.kind {
            return Tick::Wait(self.schedule(WakeupKind::Frame));
        }

        let step = self.step;
        let next = if self.mode == ReplayMode::First {
            None
        } else if step + 1 < self.steps {
            self.step += 1;
            Some(self.schedule(WakeupKind::Timer(self.sleep)))
        } else if self.mode == ReplayMode::Repeat {
            self.step = 0;
            Some(self.schedule(WakeupKind::Timer(self.repeat_sleep)))
        } else {
            None
        };
        if next.is_none() {
            self.finish();
        }
        Tick::Draw { step, next }
    }
}
