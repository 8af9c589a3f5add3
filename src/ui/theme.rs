use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub dim: String,
    pub accent: String,
    pub border: String,
    pub hint: String,
    pub blank: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes override bundled ones
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("vocadr")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        let filename = format!("{name}.toml");
        if let Some(file) = ThemeAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                if let Ok(theme) = toml::from_str::<Theme>(content) {
                    return Some(theme);
                }
            }
        }

        None
    }

    pub fn available_themes() -> Vec<String> {
        let mut themes: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        themes.sort();
        themes
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("slate").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e222a".to_string(),
            fg: "#c8ccd4".to_string(),
            dim: "#565c64".to_string(),
            accent: "#61afef".to_string(),
            border: "#3e4452".to_string(),
            hint: "#e5c07b".to_string(),
            blank: "#565c64".to_string(),
            bar_filled: "#61afef".to_string(),
            bar_empty: "#3e4452".to_string(),
            error: "#e06c75".to_string(),
            warning: "#e5c07b".to_string(),
            success: "#98c379".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn dim(&self) -> Color { Self::parse_color(&self.dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn hint(&self) -> Color { Self::parse_color(&self.hint) }
    pub fn blank(&self) -> Color { Self::parse_color(&self.blank) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        for name in Theme::available_themes() {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to load");
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(ThemeColors::parse_color("bogus"), Color::White);
    }
}
