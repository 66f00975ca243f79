use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use super::DataProvider;
use crate::config::ProviderSettings;
use crate::model::{SLIDE_BATCH_SIZE, Slide, Style, Topic};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const STYLE_RPC: &str = "get_random_style";
const SLIDES_RPC: &str = "get_random_slides";
const TOPICS_TABLE: &str = "topics";

/// Talks to a Supabase project through its PostgREST endpoint.
pub struct SupabaseProvider {
    base_url: String,
    anon_key: String,
    agent: Agent,
}

impl SupabaseProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.base_url)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.anon_key)
    }

    /// Call a Postgres function exposed over RPC and decode its rows.
    fn rpc<T: DeserializeOwned>(&self, function: &str) -> Result<Vec<T>> {
        let url = self.rest_url(&format!("rpc/{function}"));
        debug!(%url, "Calling Supabase RPC");
        let rows: Vec<T> = self
            .agent
            .post(&url)
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", self.bearer().as_str())
            .send_json(serde_json::json!({}))
            .with_context(|| format!("Failed to call {function}"))?
            .body_mut()
            .read_json()
            .with_context(|| format!("Failed to parse {function} response"))?;
        Ok(rows)
    }

    fn select_topics(&self, color: &str) -> Result<Vec<Topic>> {
        let url = self.rest_url(TOPICS_TABLE);
        debug!(%url, color, "Querying topics");
        let rows: Vec<Topic> = self
            .agent
            .get(&url)
            .query("select", "*")
            .query("color", topic_color_filter(color))
            .query("order", "id.desc")
            .query("limit", "1")
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", self.bearer().as_str())
            .call()
            .context("Failed to query topics")?
            .body_mut()
            .read_json()
            .context("Failed to parse topics response")?;
        Ok(rows)
    }
}

fn topic_color_filter(color: &str) -> String {
    format!("eq.{color}")
}

impl DataProvider for SupabaseProvider {
    fn fetch_random_style(&self) -> Result<Option<Style>> {
        Ok(self.rpc::<Style>(STYLE_RPC)?.into_iter().next())
    }

    fn fetch_random_topic(&self, color: &str) -> Result<Option<Topic>> {
        Ok(self.select_topics(color)?.into_iter().next())
    }

    fn fetch_random_slide_batch(&self) -> Result<Vec<Slide>> {
        let mut slides = self.rpc::<Slide>(SLIDES_RPC)?;
        slides.truncate(SLIDE_BATCH_SIZE);
        Ok(slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(url: &str) -> SupabaseProvider {
        SupabaseProvider::new(&ProviderSettings {
            url: url.to_string(),
            anon_key: "anon-123".to_string(),
        })
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let p = provider("https://demo.supabase.co/");
        assert_eq!(p.base_url(), "https://demo.supabase.co");
    }

    #[test]
    fn test_rest_urls() {
        let p = provider("https://demo.supabase.co");
        assert_eq!(
            p.rest_url("rpc/get_random_style"),
            "https://demo.supabase.co/rest/v1/rpc/get_random_style"
        );
        assert_eq!(p.rest_url(TOPICS_TABLE), "https://demo.supabase.co/rest/v1/topics");
    }

    #[test]
    fn test_auth_headers() {
        let p = provider("https://demo.supabase.co");
        assert_eq!(p.bearer(), "Bearer anon-123");
    }

    #[test]
    fn test_color_filter() {
        assert_eq!(topic_color_filter("blue"), "eq.blue");
    }
}
