//! ConfigStore - Local Configuration Storage

use std::fs;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::helpers::get_or_create_config_dir;

/// Load a TOML config file from the config directory
pub fn load_config<T: DeserializeOwned + Default>(filename: &str) -> Result<T> {
    let path = get_or_create_config_dir()?.join(filename);
    load_toml(&path)
}

/// Save a TOML config file into the config directory
pub fn save_config<T: Serialize>(filename: &str, config: &T) -> Result<()> {
    let path = get_or_create_config_dir()?.join(filename);
    save_toml(&path, config)
}

/// Load a TOML file, returning `T::default()` when it does not exist
pub fn load_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Write a TOML file, creating parent directories as needed
pub fn save_toml<T: Serialize>(path: &Path, config: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::virtual_list::ListSettings;
    use crate::error::Error;

    fn scratch_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("member-console-{}", uuid::Uuid::new_v4()))
            .join("list.toml")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings: ListSettings = load_toml(&scratch_path()).expect("load");
        assert_eq!(settings, ListSettings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let path = scratch_path();
        let settings = ListSettings {
            item_height: 32.0,
            chunk_size: 25,
            viewport_height: 480.0,
        };

        save_toml(&path, &settings).expect("save");
        let loaded = ListSettings::load_from(&path).expect("load");
        assert_eq!(loaded, settings);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn invalid_settings_file_is_rejected() {
        let path = scratch_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, "item_height = 0.0\n").expect("write");

        let err = ListSettings::load_from(&path).expect_err("should fail");
        assert!(matches!(err, Error::Configuration { .. }));

        fs::write(&path, "chunk_size = \"many\"\n").expect("write");
        let err = ListSettings::load_from(&path).expect_err("should fail");
        assert!(matches!(err, Error::TomlDe { .. }));

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
