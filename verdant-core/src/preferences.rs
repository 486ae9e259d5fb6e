//! Persisted user preferences, injected wherever favorites or notification
//! read flags are needed.

use crate::error::VerdantError;
use std::fs;
use std::path::{Path, PathBuf};
use verdant_schemas::{preferences::Preferences, sensor::PlantId};

pub trait PreferenceStore {
    fn preferences(&self) -> &Preferences;

    /// Replaces the stored preferences.
    fn save(&mut self, preferences: Preferences) -> Result<(), VerdantError>;

    fn is_favorite(&self, plant: &PlantId) -> bool {
        self.preferences().favorite_plants.contains(plant.as_str())
    }

    /// Flips the favorite flag for `plant` and returns the new state.
    fn toggle_favorite(&mut self, plant: &PlantId) -> Result<bool, VerdantError> {
        let mut preferences = self.preferences().clone();
        let now_favorite = if preferences.favorite_plants.remove(plant.as_str()) {
            false
        } else {
            preferences.favorite_plants.insert(plant.as_str().to_string());
            true
        };
        self.save(preferences)?;
        Ok(now_favorite)
    }

    fn is_notification_read(&self, notification_id: &str) -> bool {
        self.preferences().read_notifications.contains(notification_id)
    }

    /// Returns `false` when the notification was already marked.
    fn mark_notification_read(&mut self, notification_id: &str) -> Result<bool, VerdantError> {
        if self.is_notification_read(notification_id) {
            return Ok(false);
        }
        let mut preferences = self.preferences().clone();
        preferences
            .read_notifications
            .insert(notification_id.to_string());
        self.save(preferences)?;
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    preferences: Preferences,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn save(&mut self, preferences: Preferences) -> Result<(), VerdantError> {
        self.preferences = preferences;
        Ok(())
    }
}

/// Preferences kept in a JSON file, rewritten on every change.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    preferences: Preferences,
}

impl FilePreferences {
    /// Loads preferences from `path`, starting empty when the file does not
    /// exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VerdantError> {
        let path = path.as_ref().to_path_buf();
        let preferences = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => return Err(VerdantError::FileIO(path.display().to_string(), e)),
        };
        Ok(Self { path, preferences })
    }
}

impl PreferenceStore for FilePreferences {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn save(&mut self, preferences: Preferences) -> Result<(), VerdantError> {
        let content = serde_json::to_string_pretty(&preferences)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| VerdantError::FileIO(parent.display().to_string(), e))?;
        }
        fs::write(&self.path, content)
            .map_err(|e| VerdantError::FileIO(self.path.display().to_string(), e))?;
        self.preferences = preferences;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
