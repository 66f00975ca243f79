use crate::model::{Slide, Style, Topic};

/// Provider results cross into the reducer with the error flattened to text.
pub type FetchResult<T> = Result<T, String>;

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User actions
    RequestStyle,
    RequestTopic,
    TogglePlay,
    Restart,

    // Provider completions
    StyleFetched(FetchResult<Option<Style>>),
    TopicFetched(FetchResult<Option<Topic>>),
    SlidesFetched(FetchResult<Vec<Slide>>),

    // Timer firings
    AdvanceTimerFired,
    ProgressTimerFired,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestStyle => "request-style",
            Self::RequestTopic => "request-topic",
            Self::TogglePlay => "toggle-play",
            Self::Restart => "restart",
            Self::StyleFetched(_) => "style-fetched",
            Self::TopicFetched(_) => "topic-fetched",
            Self::SlidesFetched(_) => "slides-fetched",
            Self::AdvanceTimerFired => "advance-timer",
            Self::ProgressTimerFired => "progress-timer",
        }
    }
}
