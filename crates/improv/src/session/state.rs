use crate::model::{Slide, Style, Topic};

use super::error::{FetchStage, SessionError};

/// Upper bound of the progress indicator.
pub const PROGRESS_MAX: u8 = 100;

/// Progress added on every progress-timer firing.
pub const PROGRESS_STEP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Style,
    Topic,
    Presentation,
    End,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Topic => "topic",
            Self::Presentation => "presentation",
            Self::End => "end",
        }
    }
}

/// The fetch currently outstanding, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InFlight {
    Style,
    Topic,
    /// A matching topic was found; it is only committed once the slides arrive.
    Slides { topic: Topic },
}

impl InFlight {
    pub fn stage(&self) -> FetchStage {
        match self {
            Self::Style => FetchStage::Style,
            Self::Topic => FetchStage::Topic,
            Self::Slides { .. } => FetchStage::Slides,
        }
    }
}

/// Everything the renderer needs to draw one frame of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub selected_style: Option<Style>,
    pub selected_topic: Option<Topic>,
    pub slides: Vec<Slide>,
    pub current_slide_index: usize,
    pub progress: u8,
    pub is_playing: bool,
    pub error: Option<SessionError>,
    pub in_flight: Option<InFlight>,
}

impl SessionState {
    /// Both slide timers run exactly while this holds.
    pub fn timers_active(&self) -> bool {
        self.is_playing && self.phase == Phase::Presentation
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_slide_index)
    }

    /// The index has run off the end of the slide sequence.
    pub fn is_complete(&self) -> bool {
        self.current_slide_index >= self.slides.len()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 1-indexed "n/total" counter for the current slide.
    pub fn slide_counter(&self) -> String {
        format!("{}/{}", self.current_slide_index + 1, self.slides.len())
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn test_fresh_state() {
        let state = SessionState::default();
        assert_eq!(state.phase, Phase::Style);
        assert!(state.selected_style.is_none());
        assert!(state.selected_topic.is_none());
        assert!(state.slides.is_empty());
        assert_eq!(state.current_slide_index, 0);
        assert_eq!(state.progress, 0);
        assert!(!state.is_playing);
        assert!(state.error.is_none());
        assert!(!state.is_fetching());
    }

    #[test]
    fn test_timers_active_requires_presentation() {
        let mut state = SessionState {
            is_playing: true,
            ..Default::default()
        };
        assert!(!state.timers_active());
        state.phase = Phase::Presentation;
        assert!(state.timers_active());
        state.is_playing = false;
        assert!(!state.timers_active());
    }

    #[test]
    fn test_slide_counter_and_completion() {
        let mut state = SessionState {
            phase: Phase::Presentation,
            slides: fixtures::slides(5),
            ..Default::default()
        };
        assert_eq!(state.slide_counter(), "1/5");
        assert_eq!(state.current_slide().map(|s| s.id), Some(1));
        assert!(!state.is_complete());

        state.current_slide_index = 5;
        assert!(state.is_complete());
        assert!(state.current_slide().is_none());
    }
}
