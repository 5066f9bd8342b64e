use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tracing::warn;

use crate::config::project_dirs;

/// Favorite cities, stored as a flat JSON array of unique names.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("favorites.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Saved favorites. A missing or unreadable file counts as empty.
    pub fn load(&self) -> Vec<String> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt favorites file");
            Vec::new()
        })
    }

    pub fn save(&self, favorites: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(favorites).context("Failed to serialize favorites")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites file: {}", self.path.display()))
    }

    /// Returns `false` if `city` was already a favorite.
    pub fn add(&self, city: &str) -> Result<bool> {
        let mut favorites = self.load();
        if favorites.iter().any(|c| c == city) {
            return Ok(false);
        }

        favorites.push(city.to_string());
        self.save(&favorites)?;
        Ok(true)
    }

    /// Returns `false` if `city` was not a favorite.
    pub fn remove(&self, city: &str) -> Result<bool> {
        let mut favorites = self.load();
        let Some(idx) = favorites.iter().position(|c| c == city) else {
            return Ok(false);
        };

        favorites.remove(idx);
        self.save(&favorites)?;
        Ok(true)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.load().iter().any(|c| c == city)
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}
