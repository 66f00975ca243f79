//! The game session: a pure reducer over [`SessionState`] plus a small driver
//! that owns the slide timers and tags provider requests with a generation.
//!
//! Nothing in here touches the network or the clock directly. The UI loop feeds
//! in user actions, provider outcomes and the current [`Instant`]; the session
//! answers with the provider requests it wants issued.

pub mod effect;
pub mod error;
pub mod event;
pub mod state;
pub mod timer;
pub mod transition;

#[cfg(test)]
mod tests;

use std::time::Instant;

use tracing::{debug, info};

pub use effect::Effect;
pub use error::{FetchStage, SessionError};
pub use event::Event;
pub use state::{Phase, SessionState};
pub use timer::{SlideTimers, TimerKind, Timing};
pub use transition::{Transition, transition};

/// A provider call the session wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// The session generation this request was issued under.
    pub generation: u64,
    pub kind: FetchKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    Style,
    Topic { color: String },
    Slides,
}

impl FetchKind {
    pub fn stage(&self) -> FetchStage {
        match self {
            Self::Style => FetchStage::Style,
            Self::Topic { .. } => FetchStage::Topic,
            Self::Slides => FetchStage::Slides,
        }
    }
}

impl FetchRequest {
    /// The completion to report when the call could not be made at all.
    pub fn failed(&self, reason: impl Into<String>) -> FetchOutcome {
        let reason = reason.into();
        let event = match self.kind {
            FetchKind::Style => Event::StyleFetched(Err(reason)),
            FetchKind::Topic { .. } => Event::TopicFetched(Err(reason)),
            FetchKind::Slides => Event::SlidesFetched(Err(reason)),
        };
        FetchOutcome {
            generation: self.generation,
            event,
        }
    }
}

/// A finished provider call, ready to be fed back into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub generation: u64,
    pub event: Event,
}

pub struct Session {
    state: SessionState,
    generation: u64,
    timers: SlideTimers,
}

impl Session {
    pub fn new(timing: Timing) -> Self {
        Self {
            state: SessionState::default(),
            generation: 0,
            timers: SlideTimers::new(timing),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn timers_running(&self) -> bool {
        self.timers.is_running()
    }

    /// When the next timer is due, for scheduling a repaint.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Apply one event and carry out its effects.
    ///
    /// Returns the provider requests the caller must issue. A restart starts a new
    /// generation, so anything still in flight from before it is dropped on arrival.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> Vec<FetchRequest> {
        if matches!(event, Event::Restart) {
            self.generation += 1;
            debug!(generation = self.generation, "Session restarted");
        }

        let name = event.name();
        let before = self.state.phase;
        let Transition { state, effects } = transition(std::mem::take(&mut self.state), event);
        self.state = state;

        if self.state.phase != before {
            info!(
                event = name,
                from = before.name(),
                to = self.state.phase.name(),
                "Phase changed"
            );
        }

        let mut requests = Vec::new();
        for effect in effects {
            let kind = match effect {
                Effect::StartTimers => {
                    self.timers.start(now);
                    continue;
                }
                Effect::CancelTimers => {
                    self.timers.cancel();
                    continue;
                }
                Effect::FetchStyle => FetchKind::Style,
                Effect::FetchTopic { color } => FetchKind::Topic { color },
                Effect::FetchSlides => FetchKind::Slides,
            };
            debug!(stage = %kind.stage(), generation = self.generation, "Requesting fetch");
            requests.push(FetchRequest {
                generation: self.generation,
                kind,
            });
        }
        requests
    }

    /// Feed a provider outcome back in, unless a restart has superseded it.
    pub fn complete(&mut self, outcome: FetchOutcome, now: Instant) -> Vec<FetchRequest> {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                event = outcome.event.name(),
                "Discarding stale fetch outcome"
            );
            return Vec::new();
        }
        self.dispatch(outcome.event, now)
    }

    /// Deliver every timer firing due at `now`, earliest first.
    ///
    /// State is re-evaluated between firings: once a firing ends playback the
    /// timers are cancelled and nothing further is delivered.
    pub fn tick(&mut self, now: Instant) {
        while let Some(kind) = self.timers.fire_next(now) {
            let event = match kind {
                TimerKind::Advance => Event::AdvanceTimerFired,
                TimerKind::Progress => Event::ProgressTimerFired,
            };
            // Timer firings never produce provider requests.
            let _ = self.dispatch(event, now);
        }
    }
}
