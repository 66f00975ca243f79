pub mod supabase;

#[cfg(test)]
pub mod scripted;

use anyhow::Result;

use crate::model::{Slide, Style, Topic};
use crate::session::{Event, FetchKind, FetchOutcome, FetchRequest};

pub use supabase::SupabaseProvider;

/// The remote data store the game draws its styles, topics and slides from.
///
/// Calls block; the [`Fetcher`](crate::fetcher::Fetcher) runs them off the UI
/// thread. An empty result is `Ok(None)` / an empty batch, never an error.
pub trait DataProvider: Send + Sync {
    fn fetch_random_style(&self) -> Result<Option<Style>>;

    /// One topic whose color matches `color`. Which one is up to the provider.
    fn fetch_random_topic(&self, color: &str) -> Result<Option<Topic>>;

    fn fetch_random_slide_batch(&self) -> Result<Vec<Slide>>;
}

/// Run `request` against `provider` and package the result for the session.
pub fn resolve(provider: &dyn DataProvider, request: &FetchRequest) -> FetchOutcome {
    let event = match &request.kind {
        FetchKind::Style => Event::StyleFetched(provider.fetch_random_style().map_err(flatten)),
        FetchKind::Topic { color } => {
            Event::TopicFetched(provider.fetch_random_topic(color).map_err(flatten))
        }
        FetchKind::Slides => {
            Event::SlidesFetched(provider.fetch_random_slide_batch().map_err(flatten))
        }
    };
    FetchOutcome {
        generation: request.generation,
        event,
    }
}

fn flatten(err: anyhow::Error) -> String {
    format!("{err:#}")
}
