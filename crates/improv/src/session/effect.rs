/// Side effects requested by a transition. The session driver carries them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStyle,
    FetchTopic { color: String },
    FetchSlides,
    StartTimers,
    CancelTimers,
}
