//! Theme colors for the form
//! Reads colors from a kitty-style colour file, by default the Omarchy
//! theme at ~/.config/omarchy/current/theme/kitty.conf

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,       // Focused borders, selected options
    pub danger: Color,       // Invalid borders and error text (color1/red)
    pub success: Color,      // Success toast background
    pub text: Color,         // Primary text (foreground)
    pub text_dim: Color,     // Placeholders and hints (color8)
    pub bg: Color,           // Text drawn on the toast
    pub bg_selected: Color,  // Focused button background
    pub inactive: Color,     // Unfocused borders
    pub header: Color,       // Title
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired fallback
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg: Color::Rgb(30, 30, 46),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(166, 218, 149),
        }
    }
}

impl Theme {
    /// Load theme from `path`, or from the Omarchy theme when no path is
    /// given. Falls back to defaults when nothing usable is found.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::omarchy_path(),
        };

        path.and_then(|p| Self::load_file(&p))
            .unwrap_or_default()
    }

    fn omarchy_path() -> Option<PathBuf> {
        Some(dirs::home_dir()?.join(".config/omarchy/current/theme/kitty.conf"))
    }

    fn load_file(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("No theme at {}: {}", path.display(), e);
                return None;
            }
        };
        Self::from_kitty_conf(&content)
    }

    /// Map kitty colour names onto the form's roles
    fn from_kitty_conf(content: &str) -> Option<Self> {
        let colors = Self::parse_kitty_conf(content);
        if colors.is_empty() {
            return None;
        }

        let fallback = Self::default();
        let pick = |keys: &[&str], default: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k))
                .copied()
                .unwrap_or(default)
        };

        let accent = pick(&["color2", "color10"], fallback.accent);
        Some(Self {
            accent,
            danger: pick(&["color1", "color9"], fallback.danger),
            success: accent,
            text: pick(&["foreground"], fallback.text),
            text_dim: pick(&["color8"], fallback.text_dim),
            bg: pick(&["background"], fallback.bg),
            bg_selected: pick(&["selection_background", "color0"], fallback.bg_selected),
            inactive: pick(&["inactive_border_color", "color8"], fallback.inactive),
            header: accent,
        })
    }

    /// Parse kitty.conf format: `key #hexcolor`
    fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once(char::is_whitespace)?;
                Some((key.to_string(), Self::parse_hex_color(value)?))
            })
            .collect()
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().strip_prefix('#')?;
        if !s.is_ascii() {
            return None;
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).ok();

        match s.len() {
            6 => Some(Color::Rgb(channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?)),
            3 => Some(Color::Rgb(
                channel(&s[0..1])? * 17,
                channel(&s[1..2])? * 17,
                channel(&s[2..3])? * 17,
            )),
            _ => None,
        }
    }
}
