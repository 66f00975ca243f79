mod generations;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::state::PROGRESS_MAX;
use super::{Event, FetchKind, FetchOutcome, FetchRequest, Phase, Session, SessionState, Timing};
use crate::model::{Style, fixtures};

/// Drives a [`Session`] on a synthetic clock and records the requests it issues.
struct Harness {
    session: Session,
    now: Instant,
    pending: VecDeque<FetchRequest>,
}

impl Harness {
    fn new() -> Self {
        Self {
            session: Session::new(Timing::default()),
            now: Instant::now(),
            pending: VecDeque::new(),
        }
    }

    fn state(&self) -> &SessionState {
        self.session.state()
    }

    fn act(&mut self, event: Event) {
        let requests = self.session.dispatch(event, self.now);
        self.pending.extend(requests);
    }

    /// Answer the oldest outstanding request with `event`.
    fn respond(&mut self, event: Event) {
        let request = self
            .pending
            .pop_front()
            .expect("no outstanding fetch request");
        self.deliver(FetchOutcome {
            generation: request.generation,
            event,
        });
    }

    fn deliver(&mut self, outcome: FetchOutcome) {
        let requests = self.session.complete(outcome, self.now);
        self.pending.extend(requests);
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
        self.session.tick(self.now);
    }

    fn pick_style(&mut self, style: Style) {
        self.act(Event::RequestStyle);
        self.respond(Event::StyleFetched(Ok(Some(style))));
    }

    /// Walk a fresh session into the presentation phase with `count` slides.
    fn start_presentation(&mut self, count: usize) {
        self.pick_style(fixtures::style(1, "Noir", "blue"));
        self.act(Event::RequestTopic);
        self.respond(Event::TopicFetched(Ok(Some(fixtures::topic(
            7, "Heist", "blue",
        )))));
        self.respond(Event::SlidesFetched(Ok(fixtures::slides(count))));
        assert_eq!(self.state().phase, Phase::Presentation);
    }
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// The invariants every reachable state must satisfy.
fn assert_invariants(state: &SessionState) {
    assert!(
        state.current_slide_index <= state.slides.len(),
        "index {} beyond {} slides",
        state.current_slide_index,
        state.slides.len()
    );
    assert!(state.progress <= PROGRESS_MAX, "progress {}", state.progress);
    if state.phase != Phase::Presentation {
        assert!(!state.is_playing, "playing in phase {:?}", state.phase);
    }
    if let Some(topic) = &state.selected_topic {
        let style = state
            .selected_style
            .as_ref()
            .expect("topic selected without a style");
        assert_eq!(topic.color, style.color);
    }
}

fn request_kinds(requests: &VecDeque<FetchRequest>) -> Vec<FetchKind> {
    requests.iter().map(|r| r.kind.clone()).collect()
}
