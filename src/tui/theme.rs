use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Status, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-subject colors for the subject chip on cards
    pub subject_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut subject_colors = HashMap::new();
        subject_colors.insert("Christianity".into(), Color::Rgb(0xFF, 0xD7, 0x00));
        subject_colors.insert("Philosophy".into(), Color::Rgb(0xCC, 0x66, 0xFF));
        subject_colors.insert("Mathematics".into(), Color::Rgb(0x44, 0x88, 0xFF));
        subject_colors.insert("Physics".into(), Color::Rgb(0x44, 0xDD, 0xFF));
        subject_colors.insert("Cosmology".into(), Color::Rgb(0xFB, 0x41, 0x96));
        subject_colors.insert("Personal Development".into(), Color::Rgb(0x44, 0xFF, 0x88));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            subject_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the library's UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => {}
            }
        }

        for (subject, value) in &ui.subject_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.subject_colors.insert(subject.clone(), color);
            }
        }

        theme
    }

    /// Color for a subject chip, falling back to text color
    pub fn subject_color(&self, subject: &str) -> Color {
        self.subject_colors.get(subject).copied().unwrap_or(self.text)
    }

    /// Color for a status icon and label
    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::ToRead => self.text,
            Status::Reading => self.highlight,
            Status::Completed => self.green,
            Status::Paused => self.yellow,
        }
    }
}
