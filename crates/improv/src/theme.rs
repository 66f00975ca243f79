use eframe::egui::Color32;

/// Seeds brand colors.
pub mod palette {
    use eframe::egui::Color32;

    pub const NAVY: Color32 = Color32::from_rgb(0x0B, 0x46, 0x5E);
    pub const LIME: Color32 = Color32::from_rgb(0xA5, 0xCD, 0x39);
    pub const DARK_GREEN: Color32 = Color32::from_rgb(0x1B, 0x90, 0x46);
    pub const SKY_BLUE: Color32 = Color32::from_rgb(0x17, 0xA1, 0xC7);
    pub const TEAL: Color32 = Color32::from_rgb(0x0D, 0x5B, 0x5B);
    pub const ERROR_RED: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    /// Left and right stops of the style/topic panel gradient.
    pub panel_start: Color32,
    pub panel_end: Color32,
    pub stage_background: Color32,
    pub slide_background: Color32,
    pub celebration_background: Color32,
    pub error_background: Color32,
    pub button_background: Color32,
    pub button_foreground: Color32,
    pub progress_track: Color32,
    pub progress_fill: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: palette::NAVY,
            heading_color: palette::NAVY,
            accent: palette::LIME,
            panel_start: palette::SKY_BLUE,
            panel_end: palette::DARK_GREEN,
            stage_background: palette::SKY_BLUE,
            slide_background: palette::TEAL,
            celebration_background: palette::DARK_GREEN,
            error_background: palette::ERROR_RED,
            button_background: palette::NAVY,
            button_foreground: Color32::WHITE,
            progress_track: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            progress_fill: palette::LIME,
            h1_size: 40.0,
            h2_size: 28.0,
            body_size: 20.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x10, 0x1A, 0x1F),
            foreground: Color32::from_rgb(0xD8, 0xE6, 0xEC),
            heading_color: Color32::WHITE,
            accent: palette::LIME,
            panel_start: palette::NAVY,
            panel_end: palette::TEAL,
            stage_background: Color32::from_rgb(0x12, 0x33, 0x42),
            slide_background: Color32::from_rgb(0x0A, 0x2A, 0x2A),
            celebration_background: Color32::from_rgb(0x14, 0x5F, 0x30),
            error_background: Color32::from_rgb(0xB9, 0x1C, 0x1C),
            button_background: palette::SKY_BLUE,
            button_foreground: Color32::WHITE,
            progress_track: Color32::from_rgb(0x2A, 0x3A, 0x42),
            progress_fill: palette::LIME,
            h1_size: 40.0,
            h2_size: 28.0,
            body_size: 20.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_falls_back_to_light() {
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("solarized").name, "light");
    }

    #[test]
    fn test_toggled_round_trip() {
        let light = Theme::light();
        assert_eq!(light.toggled().name, "dark");
        assert_eq!(light.toggled().toggled().name, "light");
    }

    #[test]
    fn test_with_opacity() {
        let c = Theme::with_opacity(palette::NAVY, 0.5);
        assert_eq!(c.a(), 127);
    }
}
