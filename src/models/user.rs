//! Signed-in user as reported by the backend.

use serde::{Deserialize, Serialize};

use super::playlist::{null_as_default, PlaylistImage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Profile pictures, largest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<PlaylistImage>,
}

impl UserProfile {
    /// Display name, or the account id when the profile has none.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}
