use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::provider::{self, DataProvider};
use crate::session::{FetchOutcome, FetchRequest};

/// Called after every delivered outcome, e.g. to wake the UI loop.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// Runs provider calls off the UI thread and queues their outcomes.
///
/// The UI loop submits [`FetchRequest`]s and drains [`FetchOutcome`]s once per
/// frame; nothing here touches session state.
pub struct Fetcher {
    runtime: Runtime,
    provider: Arc<dyn DataProvider>,
    tx: UnboundedSender<FetchOutcome>,
    rx: UnboundedReceiver<FetchOutcome>,
    notify: Option<Notify>,
}

impl Fetcher {
    pub fn new(provider: Arc<dyn DataProvider>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("improv-fetch")
            .enable_all()
            .build()
            .context("Failed to start fetch runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            provider,
            tx,
            rx,
            notify: None,
        })
    }

    pub fn with_notify(mut self, notify: Notify) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Handle for other background work that should share this runtime.
    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn submit(&self, request: FetchRequest) {
        debug!(stage = %request.kind.stage(), generation = request.generation, "Submitting fetch");
        let source = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let notify = self.notify.clone();

        self.runtime.spawn(async move {
            let call = request.clone();
            let outcome =
                match tokio::task::spawn_blocking(move || provider::resolve(source.as_ref(), &call))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(stage = %request.kind.stage(), "Fetch task failed: {e}");
                        request.failed(format!("fetch task failed: {e}"))
                    }
                };

            // The receiver only goes away when the app shuts down.
            if tx.send(outcome).is_ok() {
                if let Some(notify) = notify {
                    notify();
                }
            }
        });
    }

    pub fn submit_all(&self, requests: impl IntoIterator<Item = FetchRequest>) {
        for request in requests {
            self.submit(request);
        }
    }

    /// Every outcome that has arrived since the last call, without blocking.
    pub fn drain(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Wait for the next outcome. Must not be called from inside the runtime.
    pub fn recv_blocking(&mut self) -> Option<FetchOutcome> {
        self.rx.blocking_recv()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::fixtures;
    use crate::provider::scripted::ScriptedProvider;
    use crate::session::{Event, FetchKind};

    #[test]
    fn test_outcome_delivered_with_generation() {
        let provider = ScriptedProvider::new().with_style(Ok(Some(fixtures::style(1, "Noir", "blue"))));
        let mut fetcher = Fetcher::new(Arc::new(provider)).unwrap();
        fetcher.submit(FetchRequest {
            generation: 2,
            kind: FetchKind::Style,
        });

        let outcome = fetcher.recv_blocking().unwrap();
        assert_eq!(outcome.generation, 2);
        assert_eq!(
            outcome.event,
            Event::StyleFetched(Ok(Some(fixtures::style(1, "Noir", "blue"))))
        );
        assert!(fetcher.drain().is_empty());
    }

    #[test]
    fn test_provider_error_becomes_failed_event() {
        let provider = ScriptedProvider::new().with_slides(Err("503".into()));
        let mut fetcher = Fetcher::new(Arc::new(provider)).unwrap();
        fetcher.submit(FetchRequest {
            generation: 0,
            kind: FetchKind::Slides,
        });

        let outcome = fetcher.recv_blocking().unwrap();
        assert!(matches!(outcome.event, Event::SlidesFetched(Err(_))));
    }

    #[test]
    fn test_notify_called_per_outcome() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut fetcher = Fetcher::new(Arc::new(ScriptedProvider::new()))
            .unwrap()
            .with_notify(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        fetcher.submit_all([
            FetchRequest {
                generation: 0,
                kind: FetchKind::Style,
            },
            FetchRequest {
                generation: 0,
                kind: FetchKind::Slides,
            },
        ]);
        fetcher.recv_blocking().unwrap();
        fetcher.recv_blocking().unwrap();
        // The send happens before notify, so give the worker a moment to finish.
        for _ in 0..100 {
            if calls.load(Ordering::SeqCst) == 2 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
