//! Theme preference persistence.
//!
//! The only state kept across runs is the light/dark choice, stored as JSON
//! under the user's config directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DjError, DjResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = DjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(DjError::Config(format!(
                "unknown theme '{}', expected light or dark",
                other
            ))),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: ThemePreference,
}

/// Location of the preferences file, `None` when the platform has no config dir.
pub fn preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mrdj").join("preferences.json"))
}

/// Load the stored theme. A missing or unreadable file yields the default.
pub fn load_theme_from(path: &Path) -> DjResult<ThemePreference> {
    if !path.exists() {
        return Ok(ThemePreference::default());
    }

    let json = fs::read_to_string(path)?;
    match serde_json::from_str::<Preferences>(&json) {
        Ok(prefs) => Ok(prefs.theme),
        Err(e) => {
            warn!("Ignoring corrupt preferences file {:?}: {}", path, e);
            Ok(ThemePreference::default())
        }
    }
}

/// Store the theme, creating parent directories as needed.
pub fn save_theme_to(path: &Path, theme: ThemePreference) -> DjResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&Preferences { theme })?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_theme() -> DjResult<ThemePreference> {
    match preferences_path() {
        Some(path) => load_theme_from(&path),
        None => Ok(ThemePreference::default()),
    }
}

pub fn save_theme(theme: ThemePreference) -> DjResult<()> {
    let path = preferences_path()
        .ok_or_else(|| DjError::Config("no config directory on this platform".to_string()))?;
    save_theme_to(&path, theme)
}
