use std::fmt;

use thiserror::Error;

/// Which provider call a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStage {
    Style,
    Topic,
    Slides,
}

impl FetchStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Topic => "topic",
            Self::Slides => "slides",
        }
    }

    /// Banner text when this stage's provider call fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Style => "Failed to fetch style",
            Self::Topic => "Failed to fetch topic",
            Self::Slides => "Failed to fetch slides.",
        }
    }
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-fatal session error. The `Display` text is what the error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The provider call itself failed. `reason` is kept for logs only.
    #[error("{}", .stage.failure_message())]
    FetchFailed { stage: FetchStage, reason: String },

    #[error("No styles available.")]
    NoStyles,

    #[error("No topics available for the color: {color}")]
    NoTopics { color: String },

    #[error("No slides available.")]
    NoSlides,
}

impl SessionError {
    pub fn stage(&self) -> FetchStage {
        match self {
            Self::FetchFailed { stage, .. } => *stage,
            Self::NoStyles => FetchStage::Style,
            Self::NoTopics { .. } => FetchStage::Topic,
            Self::NoSlides => FetchStage::Slides,
        }
    }

    /// True for the `EmptyResult` half of the taxonomy.
    pub fn is_empty_result(&self) -> bool {
        !matches!(self, Self::FetchFailed { .. })
    }
}
