use tracing::{debug, warn};

use super::effect::Effect;
use super::error::{FetchStage, SessionError};
use super::event::Event;
use super::state::{InFlight, PROGRESS_MAX, PROGRESS_STEP, Phase, SessionState};

/// The result of applying one event: the next state and what the driver must do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with_effect(state: SessionState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

/// Apply `event` to `state`.
///
/// Pure: no I/O, no clock. Events that make no sense in the current phase (or that
/// arrive while another fetch is outstanding) return the state untouched. Timer
/// start/cancel effects are derived from whether the controller's activation
/// condition flipped, so every path that starts or stops playback gets them.
pub fn transition(state: SessionState, event: Event) -> Transition {
    let was_active = state.timers_active();
    let mut next = apply(state, event);

    match (was_active, next.state.timers_active()) {
        (false, true) => next.effects.push(Effect::StartTimers),
        (true, false) => next.effects.push(Effect::CancelTimers),
        _ => {}
    }

    next
}

fn apply(mut state: SessionState, event: Event) -> Transition {
    match event {
        Event::RequestStyle => {
            if state.phase != Phase::Style || !accepts_trigger(&state, "request-style") {
                return Transition::unchanged(state);
            }
            state.in_flight = Some(InFlight::Style);
            Transition::with_effect(state, Effect::FetchStyle)
        }

        Event::StyleFetched(result) => {
            if state.in_flight != Some(InFlight::Style) {
                debug!("Ignoring unsolicited style result");
                return Transition::unchanged(state);
            }
            state.in_flight = None;
            match result {
                Ok(Some(style)) => {
                    state.selected_style = Some(style);
                    state.phase = Phase::Topic;
                    state.error = None;
                }
                Ok(None) => state.error = Some(SessionError::NoStyles),
                Err(reason) => state.error = Some(fetch_failed(FetchStage::Style, reason)),
            }
            Transition::unchanged(state)
        }

        Event::RequestTopic => {
            if state.phase != Phase::Topic || !accepts_trigger(&state, "request-topic") {
                return Transition::unchanged(state);
            }
            let Some(color) = state.selected_style.as_ref().map(|s| s.color.clone()) else {
                debug!("Ignoring request-topic without a selected style");
                return Transition::unchanged(state);
            };
            state.in_flight = Some(InFlight::Topic);
            Transition::with_effect(state, Effect::FetchTopic { color })
        }

        Event::TopicFetched(result) => {
            if state.in_flight != Some(InFlight::Topic) {
                debug!("Ignoring unsolicited topic result");
                return Transition::unchanged(state);
            }
            state.in_flight = None;
            let color = state
                .selected_style
                .as_ref()
                .map(|s| s.color.clone())
                .unwrap_or_default();
            match result {
                Ok(Some(topic)) if topic.color == color => {
                    state.in_flight = Some(InFlight::Slides { topic });
                    Transition::with_effect(state, Effect::FetchSlides)
                }
                Ok(Some(topic)) => {
                    warn!(
                        topic = %topic.name,
                        topic_color = %topic.color,
                        style_color = %color,
                        "Provider returned a topic of the wrong color"
                    );
                    state.error = Some(SessionError::NoTopics { color });
                    Transition::unchanged(state)
                }
                Ok(None) => {
                    state.error = Some(SessionError::NoTopics { color });
                    Transition::unchanged(state)
                }
                Err(reason) => {
                    state.error = Some(fetch_failed(FetchStage::Topic, reason));
                    Transition::unchanged(state)
                }
            }
        }

        Event::SlidesFetched(result) => {
            let topic = match state.in_flight.take() {
                Some(InFlight::Slides { topic }) => topic,
                other => {
                    debug!("Ignoring unsolicited slides result");
                    state.in_flight = other;
                    return Transition::unchanged(state);
                }
            };
            match result {
                Ok(slides) if !slides.is_empty() => {
                    state.selected_topic = Some(topic);
                    state.slides = slides;
                    state.current_slide_index = 0;
                    state.progress = 0;
                    state.is_playing = false;
                    state.phase = Phase::Presentation;
                    state.error = None;
                }
                Ok(_) => state.error = Some(SessionError::NoSlides),
                Err(reason) => state.error = Some(fetch_failed(FetchStage::Slides, reason)),
            }
            Transition::unchanged(state)
        }

        Event::TogglePlay => {
            if state.phase != Phase::Presentation || state.is_complete() {
                debug!(phase = state.phase.name(), "Ignoring toggle-play");
                return Transition::unchanged(state);
            }
            state.is_playing = !state.is_playing;
            if state.is_playing {
                // Resuming restarts the dwell interval, so the bar starts over too.
                state.progress = 0;
            }
            Transition::unchanged(state)
        }

        Event::Restart => Transition::unchanged(SessionState::default()),

        Event::AdvanceTimerFired => {
            if !state.timers_active() {
                return Transition::unchanged(state);
            }
            if state.current_slide_index + 1 < state.slides.len() {
                state.current_slide_index += 1;
                state.progress = 0;
            } else {
                state.is_playing = false;
                state.phase = Phase::End;
            }
            Transition::unchanged(state)
        }

        Event::ProgressTimerFired => {
            if state.timers_active() {
                state.progress = state.progress.saturating_add(PROGRESS_STEP).min(PROGRESS_MAX);
            }
            Transition::unchanged(state)
        }
    }
}

/// Overlapping triggers are dropped while any fetch is outstanding.
fn accepts_trigger(state: &SessionState, name: &str) -> bool {
    match &state.in_flight {
        Some(in_flight) => {
            debug!(
                trigger = name,
                in_flight = %in_flight.stage(),
                "Ignoring trigger while a fetch is outstanding"
            );
            false
        }
        None => true,
    }
}

fn fetch_failed(stage: FetchStage, reason: String) -> SessionError {
    warn!(%stage, %reason, "Fetch failed");
    SessionError::FetchFailed { stage, reason }
}
