use super::*;

#[test]
fn restart_starts_a_new_generation() {
    let mut h = Harness::new();
    assert_eq!(h.session.generation(), 0);
    h.act(Event::Restart);
    h.act(Event::Restart);
    assert_eq!(h.session.generation(), 2);
}

#[test]
fn requests_carry_current_generation() {
    let mut h = Harness::new();
    h.act(Event::Restart);
    h.act(Event::RequestStyle);
    assert_eq!(h.pending.len(), 1);
    assert_eq!(h.pending[0].generation, 1);
}

#[test]
fn style_result_after_restart_is_discarded() {
    let mut h = Harness::new();
    h.act(Event::RequestStyle);
    let stale = h.pending.pop_front().unwrap();

    h.act(Event::Restart);
    h.deliver(FetchOutcome {
        generation: stale.generation,
        event: Event::StyleFetched(Ok(Some(fixtures::style(1, "Noir", "blue")))),
    });

    assert_eq!(h.state(), &SessionState::default());
}

#[test]
fn stale_result_does_not_hijack_new_fetch() {
    let mut h = Harness::new();
    h.act(Event::RequestStyle);
    let stale = h.pending.pop_front().unwrap();

    h.act(Event::Restart);
    h.act(Event::RequestStyle);
    assert!(h.state().is_fetching());

    // The old answer arrives first and must not satisfy the new request.
    h.deliver(FetchOutcome {
        generation: stale.generation,
        event: Event::StyleFetched(Ok(Some(fixtures::style(1, "Noir", "blue")))),
    });
    assert_eq!(h.state().phase, Phase::Style);
    assert!(h.state().is_fetching());

    h.respond(Event::StyleFetched(Ok(Some(fixtures::style(2, "Opera", "red")))));
    assert_eq!(h.state().selected_style.as_ref().unwrap().name, "Opera");
}

#[test]
fn slides_after_restart_are_discarded() {
    let mut h = Harness::new();
    h.pick_style(fixtures::style(1, "Noir", "blue"));
    h.act(Event::RequestTopic);
    h.respond(Event::TopicFetched(Ok(Some(fixtures::topic(7, "Heist", "blue")))));
    let stale = h.pending.pop_front().unwrap();
    assert_eq!(stale.kind, FetchKind::Slides);

    h.act(Event::Restart);
    h.deliver(FetchOutcome {
        generation: stale.generation,
        event: Event::SlidesFetched(Ok(fixtures::slides(5))),
    });

    assert_eq!(h.state().phase, Phase::Style);
    assert!(h.state().slides.is_empty());
}

#[test]
fn overlapping_style_trigger_is_ignored() {
    let mut h = Harness::new();
    h.act(Event::RequestStyle);
    h.act(Event::RequestStyle);
    h.act(Event::RequestStyle);
    assert_eq!(h.pending.len(), 1);
}

#[test]
fn topic_trigger_ignored_while_slides_in_flight() {
    let mut h = Harness::new();
    h.pick_style(fixtures::style(1, "Noir", "blue"));
    h.act(Event::RequestTopic);
    h.act(Event::RequestTopic);
    assert_eq!(h.pending.len(), 1);

    h.respond(Event::TopicFetched(Ok(Some(fixtures::topic(7, "Heist", "blue")))));
    h.act(Event::RequestTopic);
    assert_eq!(request_kinds(&h.pending), vec![FetchKind::Slides]);
}

#[test]
fn trigger_accepted_again_after_failure() {
    let mut h = Harness::new();
    h.act(Event::RequestStyle);
    h.respond(Event::StyleFetched(Err("timeout".into())));
    h.act(Event::RequestStyle);
    assert_eq!(request_kinds(&h.pending), vec![FetchKind::Style]);
}

#[test]
fn failed_request_maps_to_matching_event() {
    let request = FetchRequest {
        generation: 3,
        kind: FetchKind::Topic {
            color: "blue".into(),
        },
    };
    let outcome = request.failed("worker panicked");
    assert_eq!(outcome.generation, 3);
    assert_eq!(
        outcome.event,
        Event::TopicFetched(Err("worker panicked".into()))
    );
}
