//! List Configuration
//!
//! `ListSettings` is the persisted, user-tunable part; `ListConfig` adds the
//! per-list empty placeholder and is validated when a list is mounted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use snafu::ensure;

use super::viewport::validate_item_height;
use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_ITEM_HEIGHT, DEFAULT_VIEWPORT_HEIGHT, LIST_SETTINGS_FILE,
};
use crate::error::{ConfigurationSnafu, Result};
use crate::utils::config_store;

/// Geometry and fetch granularity stored in `list.toml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Row height in pixels
    pub item_height: f32,
    /// Items per remote fetch
    pub chunk_size: usize,
    /// Viewport height used until the host reports a real one
    pub viewport_height: f32,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ListSettings {
    /// Load from the application config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        let settings: Self = config_store::load_config(LIST_SETTINGS_FILE)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Self = config_store::load_toml(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Persist to the application config directory
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        config_store::save_config(LIST_SETTINGS_FILE, self)
    }

    pub fn validate(&self) -> Result<()> {
        ListConfig::<()>::from_settings(self).validate()
    }
}

/// Configuration of one mounted list
#[derive(Clone, Debug)]
pub struct ListConfig<T> {
    pub item_height: f32,
    pub chunk_size: usize,
    /// Shown as a single synthetic row when the collection is empty
    pub empty_placeholder: Option<T>,
}

impl<T> ListConfig<T> {
    pub fn new(item_height: f32) -> Self {
        Self {
            item_height,
            chunk_size: DEFAULT_CHUNK_SIZE,
            empty_placeholder: None,
        }
    }

    pub fn from_settings(settings: &ListSettings) -> Self {
        Self::new(settings.item_height).with_chunk_size(settings.chunk_size)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_empty_placeholder(mut self, placeholder: T) -> Self {
        self.empty_placeholder = Some(placeholder);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_item_height(self.item_height)?;
        ensure!(
            self.chunk_size > 0,
            ConfigurationSnafu {
                message: "chunk_size must be positive",
            }
        );
        Ok(())
    }
}

impl<T> Default for ListConfig<T> {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: ListSettings = toml::from_str("chunk_size = 50").expect("parse");
        assert_eq!(settings.chunk_size, 50);
        assert_eq!(settings.item_height, DEFAULT_ITEM_HEIGHT);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn non_positive_values_fail_validation() {
        let zero_chunk = ListSettings {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_chunk.validate(),
            Err(Error::Configuration { .. })
        ));

        let config: ListConfig<u32> = ListConfig::new(-4.0);
        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn config_from_settings_copies_geometry() {
        let settings = ListSettings {
            item_height: 24.0,
            chunk_size: 40,
            viewport_height: 300.0,
        };
        let config: ListConfig<u32> = ListConfig::from_settings(&settings).with_empty_placeholder(0);
        assert_eq!(config.item_height, 24.0);
        assert_eq!(config.chunk_size, 40);
        assert_eq!(config.empty_placeholder, Some(0));
    }
}
