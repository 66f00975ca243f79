pub mod image_cache;

use eframe::egui;

use crate::session::{Event, Phase, SessionState};
use crate::theme::Theme;

use image_cache::{ImageCache, ImageEntry};

const CONTENT_WIDTH: f32 = 900.0;
const SLIDE_IMAGE_HEIGHT: f32 = 320.0;
const PROGRESS_BAR_HEIGHT: f32 = 12.0;

/// Draw the whole session and collect the user actions clicked this frame.
pub fn render_session(
    ui: &mut egui::Ui,
    state: &SessionState,
    theme: &Theme,
    images: &ImageCache,
    actions: &mut Vec<Event>,
) {
    let width = ui.available_width().min(CONTENT_WIDTH);
    ui.vertical_centered(|ui| {
        ui.set_max_width(width);
        ui.add_space(24.0);
        ui.label(
            egui::RichText::new("Seeds Improv")
                .size(theme.h1_size)
                .strong()
                .color(theme.heading_color),
        );
        ui.add_space(24.0);

        if let Some(message) = state.error_message() {
            error_banner(ui, theme, &message);
            ui.add_space(16.0);
        }

        match state.phase {
            Phase::Style => style_panel(ui, state, theme, actions),
            Phase::Topic => topic_panel(ui, state, theme, actions),
            Phase::Presentation if state.is_complete() => celebration(ui, theme, actions),
            Phase::Presentation => stage(ui, state, theme, images, actions),
            Phase::End => celebration(ui, theme, actions),
        }

        ui.add_space(24.0);
        ui.label(
            egui::RichText::new("Press H for keyboard shortcuts")
                .size(theme.body_size * 0.7)
                .color(Theme::with_opacity(theme.foreground, 0.6)),
        );
    });
}

fn style_panel(ui: &mut egui::Ui, state: &SessionState, theme: &Theme, actions: &mut Vec<Event>) {
    gradient_panel(ui, theme, |ui| {
        ui.label(heading("Select Your Style", theme.h2_size, egui::Color32::WHITE));
        ui.add_space(16.0);
        if fetch_button(ui, state, theme, "Generate Random Style") {
            actions.push(Event::RequestStyle);
        }
    });
}

fn topic_panel(ui: &mut egui::Ui, state: &SessionState, theme: &Theme, actions: &mut Vec<Event>) {
    let Some(style) = &state.selected_style else {
        return;
    };
    gradient_panel(ui, theme, |ui| {
        ui.label(heading(
            &format!("Style: {}", style.name),
            theme.h2_size,
            egui::Color32::WHITE,
        ));
        if !style.description.is_empty() {
            ui.add_space(8.0);
            ui.label(body(theme, &style.description, egui::Color32::WHITE));
        }
        ui.add_space(16.0);
        if fetch_button(ui, state, theme, "Generate Random Topic") {
            actions.push(Event::RequestTopic);
        }
    });
}

fn stage(
    ui: &mut egui::Ui,
    state: &SessionState,
    theme: &Theme,
    images: &ImageCache,
    actions: &mut Vec<Event>,
) {
    let (Some(style), Some(topic)) = (&state.selected_style, &state.selected_topic) else {
        return;
    };

    panel(theme.stage_background).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(heading("The Show Is Yours", theme.h1_size * 0.8, theme.heading_color));
            if state.is_playing {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if action_button(ui, theme, "Restart") {
                        actions.push(Event::Restart);
                    }
                });
            }
        });
        ui.add_space(8.0);
        labelled(ui, theme, "Style", &style.name);
        labelled(ui, theme, "Topic", &topic.name);
        ui.add_space(16.0);

        panel(theme.slide_background).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(heading(
                &format!("Slide {}", state.slide_counter()),
                theme.body_size,
                egui::Color32::WHITE,
            ));
            ui.add_space(8.0);

            if let Some(slide) = state.current_slide() {
                slide_image(ui, theme, images, &slide.image_url, &slide.description);
            }
            ui.add_space(12.0);
            progress_bar(ui, theme, state.progress);
            ui.add_space(12.0);

            let label = if state.is_playing {
                "Pause Timer"
            } else {
                "Start Timer"
            };
            if action_button(ui, theme, label) {
                actions.push(Event::TogglePlay);
            }
        });
    });
}

fn celebration(ui: &mut egui::Ui, theme: &Theme, actions: &mut Vec<Event>) {
    panel(theme.celebration_background).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(heading(
                "Thank You for Giving It Your Best!",
                theme.h2_size,
                egui::Color32::WHITE,
            ));
            ui.add_space(8.0);
            ui.label(body(
                theme,
                "We hope you had fun. Ready to go again?",
                egui::Color32::WHITE,
            ));
            ui.add_space(16.0);
            if action_button(ui, theme, "Start a New Game") {
                actions.push(Event::Restart);
            }
        });
    });
}

fn error_banner(ui: &mut egui::Ui, theme: &Theme, message: &str) {
    panel(theme.error_background).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(body(theme, message, egui::Color32::WHITE));
    });
}

fn slide_image(ui: &mut egui::Ui, theme: &Theme, images: &ImageCache, url: &str, description: &str) {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), SLIDE_IMAGE_HEIGHT),
        egui::Sense::hover(),
    );
    match images.get(url) {
        Some(ImageEntry::Ready(texture)) => {
            let target = image_cache::fit_rect(texture.size_vec2(), rect);
            ui.painter().image(
                texture.id(),
                target,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        Some(ImageEntry::Failed(reason)) => {
            response.on_hover_text(reason);
            let text = if description.is_empty() {
                "Image unavailable"
            } else {
                description
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(theme.body_size),
                Theme::with_opacity(egui::Color32::WHITE, 0.7),
            );
        }
        Some(ImageEntry::Loading) | None => {
            let spinner = egui::Rect::from_center_size(rect.center(), egui::vec2(32.0, 32.0));
            ui.put(spinner, egui::Spinner::new().color(egui::Color32::WHITE));
        }
    }
}

fn progress_bar(ui: &mut egui::Ui, theme: &Theme, progress: u8) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), PROGRESS_BAR_HEIGHT),
        egui::Sense::hover(),
    );
    let radius = PROGRESS_BAR_HEIGHT / 2.0;
    ui.painter().rect_filled(rect, radius, theme.progress_track);
    let fraction = f32::from(progress.min(100)) / 100.0;
    if fraction > 0.0 {
        let filled = egui::Rect::from_min_size(
            rect.min,
            egui::vec2(rect.width() * fraction, rect.height()),
        );
        ui.painter().rect_filled(filled, radius, theme.progress_fill);
    }
}

/// A panel painted with the horizontal brand gradient behind its contents.
fn gradient_panel(ui: &mut egui::Ui, theme: &Theme, add_contents: impl FnOnce(&mut egui::Ui)) {
    let background = ui.painter().add(egui::Shape::Noop);
    let response = egui::Frame::new()
        .inner_margin(24.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        })
        .response;
    ui.painter().set(
        background,
        horizontal_gradient(response.rect, theme.panel_start, theme.panel_end),
    );
}

fn horizontal_gradient(rect: egui::Rect, left: egui::Color32, right: egui::Color32) -> egui::Shape {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), left);
    mesh.colored_vertex(rect.right_top(), right);
    mesh.colored_vertex(rect.left_bottom(), left);
    mesh.colored_vertex(rect.right_bottom(), right);
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    egui::Shape::mesh(mesh)
}

fn panel(fill: egui::Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(24.0)
}

fn heading(text: &str, size: f32, color: egui::Color32) -> egui::RichText {
    egui::RichText::new(text).size(size).strong().color(color)
}

fn body(theme: &Theme, text: &str, color: egui::Color32) -> egui::RichText {
    egui::RichText::new(text).size(theme.body_size).color(color)
}

fn labelled(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(body(theme, &format!("{label}:"), egui::Color32::WHITE).strong());
        ui.label(body(theme, value, egui::Color32::WHITE));
    });
}

fn action_button(ui: &mut egui::Ui, theme: &Theme, label: &str) -> bool {
    ui.add(themed_button(theme, label)).clicked()
}

/// The phase's fetch button, disabled with a spinner while a fetch is outstanding.
fn fetch_button(ui: &mut egui::Ui, state: &SessionState, theme: &Theme, label: &str) -> bool {
    let fetching = state.is_fetching();
    let clicked = ui
        .add_enabled(!fetching, themed_button(theme, label))
        .clicked();
    if fetching {
        ui.add_space(8.0);
        ui.add(egui::Spinner::new().color(egui::Color32::WHITE));
    }
    clicked
}

fn themed_button<'a>(theme: &Theme, label: &str) -> egui::Button<'a> {
    egui::Button::new(
        egui::RichText::new(label)
            .size(theme.body_size)
            .color(theme.button_foreground),
    )
    .fill(theme.button_background)
    .corner_radius(8.0)
    .min_size(egui::vec2(0.0, 44.0))
}
