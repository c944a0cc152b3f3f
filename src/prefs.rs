//! Editor view preferences
//!
//! Persisted as RON in the user config directory. The "show grid" and
//! "show group" editor commands are plain toggles of these values.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Draw cell boundaries over the grid
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,

    /// Scene groups the user has hidden
    #[serde(default)]
    pub hidden_groups: BTreeSet<String>,
}

fn default_show_grid() -> bool {
    true
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            show_grid: default_show_grid(),
            hidden_groups: BTreeSet::new(),
        }
    }
}

impl EditorPreferences {
    /// Flip grid visibility, returning the new value
    pub fn toggle_show_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    pub fn is_group_visible(&self, group: &str) -> bool {
        !self.hidden_groups.contains(group)
    }

    /// Flip a group's visibility, returning whether it is now visible
    pub fn toggle_group(&mut self, group: &str) -> bool {
        if self.hidden_groups.remove(group) {
            true
        } else {
            self.hidden_groups.insert(group.to_string());
            false
        }
    }

    /// Location of the preferences file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tilegrid")
            .join("preferences.ron")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        format::parse_ron(&contents, &path.display().to_string())
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                eprintln!("Ignoring preferences {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load preferences that are about to be edited and saved back.
    ///
    /// A missing file gives defaults. A file that cannot be read or parsed
    /// is an error, so saving never replaces settings the user still has.
    pub fn load_for_update(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format::to_ron_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toggle_show_grid() {
        let mut prefs = EditorPreferences::default();
        assert!(prefs.show_grid);
        assert!(!prefs.toggle_show_grid());
        assert!(prefs.toggle_show_grid());
    }

    #[test]
    fn test_toggle_group() {
        let mut prefs = EditorPreferences::default();
        assert!(prefs.is_group_visible("collision"));

        assert!(!prefs.toggle_group("collision"));
        assert!(!prefs.is_group_visible("collision"));
        assert!(prefs.is_group_visible("sprites"));

        assert!(prefs.toggle_group("collision"));
        assert!(prefs.hidden_groups.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.ron");

        let mut prefs = EditorPreferences::default();
        prefs.toggle_show_grid();
        prefs.toggle_group("lights");
        prefs.save(&path).unwrap();

        assert_eq!(EditorPreferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.ron");
        fs::write(&path, "()").unwrap();

        assert_eq!(EditorPreferences::load(&path).unwrap(), EditorPreferences::default());
    }

    #[test]
    fn test_load_for_update() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.ron");
        assert_eq!(
            EditorPreferences::load_for_update(&path).unwrap(),
            EditorPreferences::default()
        );

        fs::write(&path, "(hidden_groups: [\"lights\"").unwrap();
        assert!(EditorPreferences::load_for_update(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "(hidden_groups: [\"lights\"");
    }
}
