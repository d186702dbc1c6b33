use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "chambers";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dim: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub highlight_bg: String,
    pub highlight_fg: String,
    pub locked: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in `<config_dir>/citedr/themes/` shadow the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(dir) = Self::user_dir() {
            let user_theme_path = dir.join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => {
                        tracing::warn!(path = %user_theme_path.display(), error = %e, "bad user theme");
                    }
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    /// Bundled theme names plus any user theme files, sorted and deduplicated.
    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        if let Some(dir) = Self::user_dir()
            && let Ok(entries) = fs::read_dir(dir)
        {
            names.extend(entries.filter_map(|e| {
                let name = e.ok()?.file_name().into_string().ok()?;
                name.strip_suffix(".toml").map(|n| n.to_string())
            }));
        }
        names.sort();
        names.dedup();
        names
    }

    fn user_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("citedr").join("themes"))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "fallback".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1b1d23".to_string(),
            fg: "#d8d4c8".to_string(),
            text_dim: "#6b6f7a".to_string(),
            accent: "#c9a45c".to_string(),
            accent_dim: "#4a4336".to_string(),
            border: "#3a3d46".to_string(),
            border_focused: "#c9a45c".to_string(),
            header_bg: "#262932".to_string(),
            header_fg: "#e8e2d0".to_string(),
            bar_filled: "#c9a45c".to_string(),
            bar_empty: "#2c2f38".to_string(),
            highlight_bg: "#3b3426".to_string(),
            highlight_fg: "#f1e6c8".to_string(),
            locked: "#50535c".to_string(),
            error: "#d0736b".to_string(),
            warning: "#d9b26a".to_string(),
            success: "#8fb87a".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn highlight_bg(&self) -> Color { Self::parse_color(&self.highlight_bg) }
    pub fn highlight_fg(&self) -> Color { Self::parse_color(&self.highlight_fg) }
    pub fn locked(&self) -> Color { Self::parse_color(&self.locked) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
