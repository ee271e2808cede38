//! Configuration file parsing for the portal controllers
//!
//! Supports:
//! - `.psp/config.toml` - Site markers, page slugs, upload and form limits

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, read_settings, save_settings, validate_settings};
pub use types::*;
