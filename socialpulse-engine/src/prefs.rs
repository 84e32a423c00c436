//! Accessibility preferences, persisted as a small separate blob.

use serde::{Deserialize, Serialize};

use crate::StateStore;
use crate::constants::PREFS_KEY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityPrefs {
    #[serde(default)]
    pub high_contrast: bool,
    #[serde(default)]
    pub reduce_motion: bool,
    #[serde(default)]
    pub large_text: bool,
}

/// Load preferences; a missing or malformed blob degrades to defaults.
pub fn load_prefs<S: StateStore>(store: &S) -> AccessibilityPrefs {
    match store.load_state(PREFS_KEY) {
        Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_default(),
        _ => AccessibilityPrefs::default(),
    }
}

/// Persist preferences under their own key.
///
/// # Errors
///
/// Returns the store's error when the write fails.
pub fn save_prefs<S: StateStore>(store: &S, prefs: AccessibilityPrefs) -> Result<(), S::Error> {
    let blob = serde_json::to_string(&prefs).unwrap_or_else(|_| "{}".to_string());
    store.save_state(PREFS_KEY, &blob)
}
