use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::provider::SupabaseProvider;
use crate::session::{Event, Session, SessionError, SessionState, Timing};

/// Play the fetch half of one round against the configured provider and print
/// what it drew.
pub fn run() -> Result<()> {
    let config = Config::load_or_default();
    let settings = config.provider_settings()?;
    let provider = Arc::new(SupabaseProvider::new(&settings));
    println!("{} {}", "Provider:".bold(), provider.base_url());

    let mut fetcher = Fetcher::new(provider)?;
    let mut session = Session::new(Timing::default());

    draw_round(&mut session, &mut fetcher)?;
    print_round(session.state());
    println!();
    println!("{}", "Provider looks good.".green().bold());
    Ok(())
}

/// Request a style, then a topic, waiting for each fetch chain to settle.
fn draw_round(session: &mut Session, fetcher: &mut Fetcher) -> Result<()> {
    settle(session, fetcher, Event::RequestStyle)?;
    settle(session, fetcher, Event::RequestTopic)
}

fn settle(session: &mut Session, fetcher: &mut Fetcher, event: Event) -> Result<()> {
    let requests = session.dispatch(event, Instant::now());
    let mut outstanding = requests.len();
    fetcher.submit_all(requests);

    while outstanding > 0 {
        let outcome = fetcher
            .recv_blocking()
            .context("Fetch worker stopped before answering")?;
        outstanding -= 1;
        let follow_up = session.complete(outcome, Instant::now());
        outstanding += follow_up.len();
        fetcher.submit_all(follow_up);
    }

    match &session.state().error {
        None => Ok(()),
        Some(error @ SessionError::FetchFailed { reason, .. }) => {
            anyhow::bail!("{error}: {reason}")
        }
        Some(error) if error.is_empty_result() => {
            anyhow::bail!("{error} (check that the {} data is seeded)", error.stage())
        }
        Some(error) => anyhow::bail!("{error}"),
    }
}

fn print_round(state: &SessionState) {
    if let Some(style) = &state.selected_style {
        println!(
            "{} {} {}",
            "Style:".bold(),
            style.name,
            format!("({})", style.color).dimmed()
        );
        if !style.description.is_empty() {
            println!("  {}", style.description.dimmed());
        }
    }
    if let Some(topic) = &state.selected_topic {
        println!("{} {}", "Topic:".bold(), topic.name);
    }
    println!("{} {}", "Slides:".bold(), state.slides.len());
    for (i, slide) in state.slides.iter().enumerate() {
        println!("  {}. {}", i + 1, slide.image_url);
    }
}
