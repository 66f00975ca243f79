use std::time::{Duration, Instant};

/// Default time a slide stays on screen before advancing.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(20);

/// Shortest and longest dwell a session accepts.
pub const MIN_DWELL: Duration = Duration::from_secs(1);
pub const MAX_DWELL: Duration = Duration::from_secs(600);

/// Progress-timer firings per dwell interval. With a step of 5 this reaches 100.
pub const PROGRESS_TICKS_PER_DWELL: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub dwell: Duration,
}

impl Timing {
    /// `dwell` is clamped to `MIN_DWELL..=MAX_DWELL`, so both timer periods are
    /// non-zero and deadlines stay far from `Instant` overflow.
    pub fn new(dwell: Duration) -> Self {
        Self {
            dwell: dwell.clamp(MIN_DWELL, MAX_DWELL),
        }
    }

    pub fn progress_tick(&self) -> Duration {
        self.dwell / PROGRESS_TICKS_PER_DWELL
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(DEFAULT_DWELL)
    }
}

/// A repeating deadline. Nothing runs in the background: the owner polls it.
#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Arm for a full period from `now`, discarding any previous deadline.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Disarm. Cancelling a disarmed timer is a no-op.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| d <= now)
    }

    /// Fire once if due. The next deadline counts from the missed one, not from
    /// `now`, so a late poll catches up instead of drifting.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = Some(deadline + self.period);
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Advance,
    Progress,
}

/// The advancement and progress timers, started and cancelled together.
#[derive(Debug, Clone)]
pub struct SlideTimers {
    advance: Timer,
    progress: Timer,
}

impl SlideTimers {
    pub fn new(timing: Timing) -> Self {
        Self {
            advance: Timer::new(timing.dwell),
            progress: Timer::new(timing.progress_tick()),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.advance.start(now);
        self.progress.start(now);
    }

    pub fn cancel(&mut self) {
        self.advance.cancel();
        self.progress.cancel();
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.advance.is_armed() || self.progress.is_armed()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.advance.deadline(), self.progress.deadline()) {
            (Some(a), Some(p)) => Some(a.min(p)),
            (a, p) => a.or(p),
        }
    }

    /// Fire the earliest due timer, if any.
    ///
    /// On equal deadlines the progress timer goes first, so the bar reaches 100
    /// before the slide changes underneath it.
    pub fn fire_next(&mut self, now: Instant) -> Option<TimerKind> {
        let kind = match (self.progress.is_due(now), self.advance.is_due(now)) {
            (true, true) => {
                if self.progress.deadline() <= self.advance.deadline() {
                    TimerKind::Progress
                } else {
                    TimerKind::Advance
                }
            }
            (true, false) => TimerKind::Progress,
            (false, true) => TimerKind::Advance,
            (false, false) => return None,
        };

        match kind {
            TimerKind::Advance => self.advance.fire_if_due(now),
            TimerKind::Progress => self.progress.fire_if_due(now),
        };
        Some(kind)
    }
}
