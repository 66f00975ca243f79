use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{Context, Result};
use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use ureq::Agent;

use crate::fetcher::Notify;

/// Refuse slide images larger than this.
const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub enum ImageEntry {
    Loading,
    Ready(egui::TextureHandle),
    Failed(String),
}

type Loaded = (String, Result<egui::ColorImage, String>);

/// Downloads and decodes slide images in the background, keyed by URL.
pub struct ImageCache {
    entries: HashMap<String, ImageEntry>,
    agent: Agent,
    runtime: Handle,
    tx: UnboundedSender<Loaded>,
    rx: UnboundedReceiver<Loaded>,
    notify: Option<Notify>,
}

impl ImageCache {
    pub fn new(runtime: Handle, notify: Option<Notify>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build()
            .into();
        Self {
            entries: HashMap::new(),
            agent,
            runtime,
            tx,
            rx,
            notify,
        }
    }

    /// Start loading `url` unless it is already cached or in progress.
    pub fn request(&mut self, url: &str) {
        if self.entries.contains_key(url) {
            return;
        }
        debug!(url, "Loading slide image");
        self.entries.insert(url.to_string(), ImageEntry::Loading);

        let url = url.to_string();
        let agent = self.agent.clone();
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        self.runtime.spawn_blocking(move || {
            let result = load_image(&agent, &url).map_err(|e| format!("{e:#}"));
            if tx.send((url, result)).is_ok() {
                if let Some(notify) = notify {
                    notify();
                }
            }
        });
    }

    pub fn prefetch<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) {
        for url in urls {
            self.request(url);
        }
    }

    /// Drop every entry, and its texture, whose URL is not in `keep`.
    pub fn retain_urls<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: HashSet<&str> = keep.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|url, _| keep.contains(url.as_str()));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted slide images");
        }
    }

    /// Upload finished decodes as textures. Call once per frame.
    ///
    /// Loads for URLs evicted while in flight are discarded.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((url, result)) = self.rx.try_recv() {
            if !self.entries.contains_key(&url) {
                continue;
            }
            let entry = match result {
                Ok(image) => {
                    let texture = ctx.load_texture(&url, image, egui::TextureOptions::LINEAR);
                    ImageEntry::Ready(texture)
                }
                Err(reason) => {
                    warn!(%url, %reason, "Slide image failed to load");
                    ImageEntry::Failed(reason)
                }
            };
            self.entries.insert(url, entry);
        }
    }

    pub fn get(&self, url: &str) -> Option<&ImageEntry> {
        self.entries.get(url)
    }
}

/// Slide URLs come from the provider, so only remote images are loaded.
fn load_image(agent: &Agent, url: &str) -> Result<egui::ColorImage> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("Refusing to load non-http image URL: {url}");
    }
    let bytes = agent
        .get(url)
        .call()
        .with_context(|| format!("Failed to download {url}"))?
        .body_mut()
        .with_config()
        .limit(MAX_IMAGE_BYTES)
        .read_to_vec()
        .with_context(|| format!("Failed to read {url}"))?;
    decode_image(&bytes)
}

pub fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage> {
    let image = image::load_from_memory(bytes)
        .context("Unsupported image data")?
        .into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        image.as_raw(),
    ))
}

/// Largest rect with the image's aspect ratio that fits centered in `bounds`.
pub fn fit_rect(image_size: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    egui::Rect::from_center_size(bounds.center(), image_size * scale)
}
