use super::error::{AppError, AppResult};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Default highlight color for collected-word markers.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#fef08a";

/// Per-user settings, persisted as a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Store key for the user's collection. Empty until the user picks one.
    pub username: String,
    /// Hex color applied to highlight markers, e.g. "#fef08a".
    pub highlight_color: String,
    /// Whether clicking a highlighted word opens the lookup popup.
    pub click_to_show_popup: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            click_to_show_popup: true,
        }
    }
}

impl UserSettings {
    pub fn settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "wordvault", "wordvault")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Io("Failed to determine config directory".to_string()))
    }

    /// Load settings from disk, writing defaults on first run.
    pub async fn load() -> AppResult<Self> {
        let path = Self::settings_path()?;

        if !path.exists() {
            let settings = Self::default();
            settings.save().await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))
    }

    /// Persist settings to disk as pretty JSON.
    pub async fn save(&self) -> AppResult<()> {
        if !is_valid_highlight_color(&self.highlight_color) {
            return Err(AppError::Validation(format!(
                "Invalid highlight color '{}'",
                self.highlight_color
            )));
        }

        let path = Self::settings_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
            .await
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }
}

/// Check that a color is a six-digit hex value like "#fef08a".
pub fn is_valid_highlight_color(value: &str) -> bool {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));
    re.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UserSettings::default();
        assert!(settings.username.is_empty());
        assert_eq!(settings.highlight_color, DEFAULT_HIGHLIGHT_COLOR);
        assert!(settings.click_to_show_popup);
    }

    #[test]
    fn test_highlight_color_validation() {
        assert!(is_valid_highlight_color("#fef08a"));
        assert!(is_valid_highlight_color("#ABCDEF"));
        assert!(!is_valid_highlight_color("fef08a"));
        assert!(!is_valid_highlight_color("#fff"));
        assert!(!is_valid_highlight_color("#gggggg"));
        assert!(!is_valid_highlight_color(""));
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_color() {
        let settings = UserSettings {
            username: "reader".to_string(),
            highlight_color: "yellow".to_string(),
            click_to_show_popup: true,
        };
        assert!(matches!(
            settings.save().await,
            Err(AppError::Validation(_))
        ));
    }
}
