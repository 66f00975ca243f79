use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::Config;
use crate::fetcher::{Fetcher, Notify};
use crate::provider::SupabaseProvider;
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::session::{Event, Phase, Session, Timing};
use crate::theme::Theme;

const TITLE: &str = "Seeds Improv";
const TOAST_DURATION: f32 = 1.5;
const TOAST_FADE_START: f32 = 1.0;

/// Launch options after CLI flags have been merged over the config file.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub windowed: bool,
    pub theme: String,
    pub dwell: Duration,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < TOAST_FADE_START {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - TOAST_FADE_START) / (TOAST_DURATION - TOAST_FADE_START)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

struct ImprovApp {
    session: Session,
    fetcher: Fetcher,
    images: ImageCache,
    theme: Theme,
    show_hud: bool,
    toast: Option<Toast>,
}

impl ImprovApp {
    fn new(fetcher: Fetcher, images: ImageCache, options: &LaunchOptions) -> Self {
        Self {
            session: Session::new(Timing::new(options.dwell)),
            fetcher,
            images,
            theme: Theme::from_name(&options.theme),
            show_hud: false,
            toast: None,
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    fn dispatch(&mut self, event: Event, now: Instant) {
        let requests = self.session.dispatch(event, now);
        self.fetcher.submit_all(requests);
    }

    /// The action Enter triggers in the current phase.
    fn primary_action(&self) -> Event {
        let state = self.session.state();
        match state.phase {
            Phase::Style => Event::RequestStyle,
            Phase::Topic => Event::RequestTopic,
            Phase::Presentation if state.is_complete() => Event::Restart,
            Phase::Presentation => Event::TogglePlay,
            Phase::End => Event::Restart,
        }
    }

    /// Feed finished fetches back into the session, issuing any follow-up requests.
    fn drain_fetches(&mut self, now: Instant) {
        for outcome in self.fetcher.drain() {
            let requests = self.session.complete(outcome, now);
            self.fetcher.submit_all(requests);
        }
    }

    /// Load the current batch's images and drop textures from earlier rounds.
    fn sync_slide_images(&mut self) {
        let urls: Vec<String> = self
            .session
            .state()
            .slides
            .iter()
            .map(|s| s.image_url.clone())
            .collect();
        self.images.retain_urls(urls.iter().map(String::as_str));
        self.images.prefetch(urls.iter().map(String::as_str));
    }
}

impl eframe::App for ImprovApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.drain_fetches(now);
        self.images.poll(ctx);
        self.session.tick(now);

        // Collect viewport commands to send after the input closure
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut actions: Vec<Event> = Vec::new();
        let mut toggle_theme = false;
        let mut toggle_hud = false;
        let primary = self.primary_action();
        let presenting = self.session.state().phase == Phase::Presentation;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }
            if i.key_pressed(egui::Key::D) {
                toggle_theme = true;
                return;
            }
            if i.key_pressed(egui::Key::H) {
                toggle_hud = true;
                return;
            }
            if i.key_pressed(egui::Key::R) {
                actions.push(Event::Restart);
                return;
            }
            if i.key_pressed(egui::Key::Space) && presenting {
                actions.push(Event::TogglePlay);
                return;
            }
            if i.key_pressed(egui::Key::Enter) {
                actions.push(primary);
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_theme {
            self.toggle_theme();
        }
        if toggle_hud {
            self.show_hud = !self.show_hud;
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    render::render_session(
                        ui,
                        self.session.state(),
                        &self.theme,
                        &self.images,
                        &mut actions,
                    );
                });

                if let Some(ref toast) = self.toast {
                    draw_toast(ui, &self.theme, rect, toast);
                    ctx.request_repaint();
                }
                if self.show_hud {
                    draw_hud(ui, &self.theme, rect);
                }
            });

        for event in actions {
            debug!(event = event.name(), "User action");
            self.dispatch(event, now);
        }
        self.sync_slide_images();

        if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

fn draw_toast(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, toast: &Toast) {
    let opacity = toast.opacity();
    if opacity <= 0.0 {
        return;
    }
    let color = Theme::with_opacity(theme.button_foreground, opacity * 0.9);
    let bg = Theme::with_opacity(theme.button_background, opacity * 0.9);
    let galley = ui.painter().layout_no_wrap(
        toast.message.clone(),
        egui::FontId::proportional(theme.body_size),
        color,
    );
    let padding = 16.0;
    let toast_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.bottom() - 80.0,
        ),
        egui::vec2(
            galley.rect.width() + padding * 2.0,
            galley.rect.height() + padding * 2.0,
        ),
    );
    ui.painter().rect_filled(toast_rect, 8.0, bg);
    ui.painter().galley(
        egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
        galley,
        color,
    );
}

fn draw_hud(ui: &egui::Ui, theme: &Theme, rect: egui::Rect) {
    let shortcuts = [
        ("Enter", "Next step in the current phase"),
        ("Space", "Start / pause the slide timer"),
        ("R", "Restart the game"),
        ("D", "Toggle theme"),
        ("F", "Toggle fullscreen"),
        ("H", "Toggle this HUD"),
        ("Q", "Quit"),
    ];

    let bg = Theme::with_opacity(theme.button_background, 0.92);
    let text_color = Theme::with_opacity(theme.button_foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.95);

    let padding = 24.0;
    let line_height = 32.0;
    let hud_height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0;
    let hud_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(420.0, hud_height));
    ui.painter().rect_filled(hud_rect, 12.0, bg);

    let title = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0),
        text_color,
    );
    ui.painter().galley(
        egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding),
        title,
        text_color,
    );

    let mut y = hud_rect.top() + padding + 40.0;
    for (key, desc) in &shortcuts {
        let key_galley =
            ui.painter()
                .layout_no_wrap(key.to_string(), egui::FontId::monospace(15.0), key_color);
        ui.painter()
            .galley(egui::pos2(hud_rect.left() + padding, y), key_galley, key_color);

        let desc_galley = ui.painter().layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0),
            text_color,
        );
        ui.painter().galley(
            egui::pos2(hud_rect.left() + padding + 90.0, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let settings = config.provider_settings()?;
    info!(url = %settings.url, dwell_secs = options.dwell.as_secs(), "Starting improv");

    let provider = Arc::new(SupabaseProvider::new(&settings));
    let fetcher = Fetcher::new(provider)?;

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title(TITLE)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(TITLE)
    };

    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        native,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let notify: Notify = Arc::new(move || ctx.request_repaint());
            let fetcher = fetcher.with_notify(Arc::clone(&notify));
            let images = ImageCache::new(fetcher.handle(), Some(notify));
            Ok(Box::new(ImprovApp::new(fetcher, images, &options)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
