//! Persisted session: the bearer token and who it belongs to.

use crate::consts::cli_consts::{CONFIG_DIR, CONFIG_FILE};
use crate::environment::Environment;
use crate::models::SessionProfile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Bearer token sent on every request.
    pub token: String,

    /// Backend the token was issued by.
    #[serde(default)]
    pub environment: Environment,

    /// Profile as of login. Shown by `whoami`; sessions re-read it from the
    /// backend and fall back to this copy only when it is unreachable.
    #[serde(default)]
    pub profile: Option<SessionProfile>,
}

impl Config {
    /// Create Config with the given token.
    pub fn new(token: String, environment: Environment, profile: Option<SessionProfile>) -> Self {
        Config {
            token,
            environment,
            profile,
        }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the session file. A missing file is not an error.
    pub fn clear_session(path: &Path) -> Result<(), std::io::Error> {
        if !path.ends_with(CONFIG_FILE) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path must end with {}", CONFIG_FILE),
            ));
        }
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
    }
}

/// `~/.contadesk/config.json`
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Home directory not found")
    })?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rol;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn profile() -> SessionProfile {
        SessionProfile {
            usuario_id: 5,
            username: "contador.perez".to_string(),
            rol: Rol::Contador,
            cliente: None,
            contador: None,
        }
    }

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::new("tok-123".to_string(), Environment::Local, Some(profile()));
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let config = Config::new("tok".to_string(), Environment::default(), None);
        let result = config.save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a configuration should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config1 = Config::new("tok-1".to_string(), Environment::Local, None);
        config1.save(&path).unwrap();

        let config2 = Config::new("tok-2".to_string(), Environment::Local, Some(profile()));
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // Only a file named config.json may be removed.
    fn test_clear_session_guards_path() {
        let dir = tempdir().unwrap();
        let other = dir.path().join("notes.txt");
        fs::write(&other, "keep me").unwrap();

        assert!(Config::clear_session(&other).is_err());
        assert!(other.exists());

        let path = dir.path().join("config.json");
        assert!(Config::clear_session(&path).is_ok(), "missing file is fine");
        Config::new("tok".into(), Environment::Local, None)
            .save(&path)
            .unwrap();
        Config::clear_session(&path).unwrap();
        assert!(!path.exists());
    }
}
