//! List Constants
//!
//! Centralized defaults for the windowed member lists.

/// Items requested per remote fetch; fetches are aligned to multiples of this
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Row height in pixels for member rows
pub const DEFAULT_ITEM_HEIGHT: f32 = 56.0;

/// Viewport height assumed before the first resize event arrives
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 560.0;

/// Name of the settings file inside the config directory
pub const LIST_SETTINGS_FILE: &str = "list.toml";

/// Upper bound a host waits for outstanding fetches in `wait_idle`
pub const IDLE_WAIT_TIMEOUT_MS: u64 = 5_000;
