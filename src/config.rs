use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;

/// Default preferences file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// User preferences persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Handle recorded as the changelog author.
    #[serde(default)]
    pub username: String,
    /// Value for `git config user.name`.
    #[serde(default)]
    pub git_name: String,
    /// Value for `git config user.email`.
    #[serde(default)]
    pub git_email: String,
    /// Keys this tool does not know about, written back unchanged on save.
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
    #[serde(skip)]
    path: PathBuf,
}

/// One of the preference fields the user is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Username,
    GitName,
    GitEmail,
}

impl Preference {
    pub const ALL: [Preference; 3] = [
        Preference::Username,
        Preference::GitName,
        Preference::GitEmail,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            Preference::Username => "Enter your username (for tracking)",
            Preference::GitName => "Enter your git user.name",
            Preference::GitEmail => "Enter your git user.email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preference::Username => "Username",
            Preference::GitName => "git user.name",
            Preference::GitEmail => "git user.email",
        }
    }
}

impl Config {
    /// Load preferences from `path`. A missing or unreadable file yields an
    /// empty record that will save back to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<Config>(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt config {}: {}", path.display(), e);
                Config::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}", path.display());
                Config::default()
            }
            Err(e) => {
                warn!("Could not read config {}: {}", path.display(), e);
                Config::default()
            }
        };
        Self { path, ..config }
    }

    /// Save preferences back to the file they were loaded from.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.path, content + "\n")?;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(
        path: impl Into<PathBuf>,
        username: impl Into<String>,
        git_name: impl Into<String>,
        git_email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            git_name: git_name.into(),
            git_email: git_email.into(),
            extra: serde_json::Map::new(),
            path: path.into(),
        }
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self::new(
            DEFAULT_CONFIG_FILE,
            "tester",
            "Test User",
            "test@example.com",
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, preference: Preference) -> &str {
        match preference {
            Preference::Username => &self.username,
            Preference::GitName => &self.git_name,
            Preference::GitEmail => &self.git_email,
        }
    }

    pub fn set(&mut self, preference: Preference, value: String) {
        match preference {
            Preference::Username => self.username = value,
            Preference::GitName => self.git_name = value,
            Preference::GitEmail => self.git_email = value,
        }
    }

    /// Fields that still need a value.
    pub fn missing(&self) -> Vec<Preference> {
        Preference::ALL
            .into_iter()
            .filter(|p| self.get(*p).trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_tests() {
        let config = Config::default_for_tests();
        assert_eq!(config.username, "tester");
        assert!(config.missing().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::load(&path);
        assert_eq!(config.path(), path);
        assert_eq!(config.missing(), Preference::ALL.to_vec());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = Config::load(&path);
        assert_eq!(config.username, "");
        assert_eq!(config.path(), path);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"username": "jdoe", "theme": "dark"}"#).unwrap();
        let config = Config::load(&path);
        assert_eq!(config.username, "jdoe");
        assert_eq!(
            config.missing(),
            vec![Preference::GitName, Preference::GitEmail]
        );
    }

    #[test]
    fn test_save_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"username": "jdoe", "theme": "dark", "recent": ["a", "b"]}"#,
        )
        .unwrap();

        let mut config = Config::load(&path);
        config.set(Preference::GitName, "Jane Doe".to_string());
        config.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "jdoe",
                "git_name": "Jane Doe",
                "git_email": "",
                "theme": "dark",
                "recent": ["a", "b"],
            })
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config::new(&path, "jdoe", "Jane Doe", "jane@example.com");
        config.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "jdoe",
                "git_name": "Jane Doe",
                "git_email": "jane@example.com",
            })
        );
        assert_eq!(Config::load(&path), config);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set(Preference::GitEmail, "a@b.c".to_string());
        assert_eq!(config.get(Preference::GitEmail), "a@b.c");
        assert_eq!(config.missing().len(), 2);
    }
}
