//! Settings parser for .psp/config.toml

use super::types::Settings;
use psp_core::prelude::*;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
const PSP_DIR: &str = ".psp";

/// Read and validate settings, failing when the file is absent or malformed
pub fn read_settings(project_path: &Path) -> Result<Settings> {
    let config_path = project_path.join(PSP_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Err(Error::ConfigNotFound { path: config_path });
    }

    let content = std::fs::read_to_string(&config_path)?;
    let settings: Settings = toml::from_str(&content)
        .map_err(|e| Error::config_invalid(format!("{:?}: {}", config_path, e)))?;
    validate_settings(&settings)?;

    debug!("Loaded settings from {:?}", config_path);
    Ok(settings)
}

/// Load settings from .psp/config.toml, falling back to defaults
pub fn load_settings(project_path: &Path) -> Settings {
    match read_settings(project_path) {
        Ok(settings) => settings,
        Err(Error::ConfigNotFound { path }) => {
            debug!("No config file at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            warn!("Failed to load settings: {}", e);
            Settings::default()
        }
    }
}

/// Reject settings the controllers cannot work with
pub fn validate_settings(settings: &Settings) -> Result<()> {
    let site = &settings.site;
    if site.branded_marker.trim().is_empty() || site.unassigned_marker.trim().is_empty() {
        return Err(Error::config_invalid("site markers must not be empty"));
    }
    if site
        .branded_marker
        .eq_ignore_ascii_case(&site.unassigned_marker)
    {
        return Err(Error::config_invalid(
            "branded and unassigned markers must differ",
        ));
    }
    if settings.upload.max_files == 0 {
        return Err(Error::config_invalid("upload.max_files must be at least 1"));
    }
    if settings.upload.max_file_bytes > settings.upload.max_total_bytes {
        return Err(Error::config_invalid(
            "upload.max_file_bytes cannot exceed upload.max_total_bytes",
        ));
    }
    Ok(())
}

/// Create default config file in .psp/ directory
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let psp_dir = project_path.join(PSP_DIR);

    if !psp_dir.exists() {
        std::fs::create_dir_all(&psp_dir)
            .map_err(|e| Error::config(format!("Failed to create .psp dir: {}", e)))?;
    }

    let config_path = psp_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# PSP Portal Configuration

[site]
branded_marker = "Branded"
unassigned_marker = "Unassigned"
branded_base_url = "/Branded/s/"
unassigned_base_url = "/Unassigned/s/"

[upload]
max_files = 3
max_total_bytes = 5242880   # 5 MB, raw bytes
max_file_bytes = 5242880
file_name_display_chars = 24

[forms]
description_max_chars = 1000
questionnaire_min_answered = 13
minor_age = 18

# [pages] overrides individual page slugs, e.g.
# error = "error"
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

/// Save settings to .psp/config.toml
pub fn save_settings(project_path: &Path, settings: &Settings) -> Result<()> {
    validate_settings(settings)?;

    let psp_dir = project_path.join(PSP_DIR);

    // Ensure directory exists
    if !psp_dir.exists() {
        std::fs::create_dir_all(&psp_dir)
            .map_err(|e| Error::config(format!("Failed to create .psp dir: {}", e)))?;
    }

    let config_path = psp_dir.join(CONFIG_FILENAME);
    let temp_path = psp_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("# PSP Portal Configuration\n\n{}", content);

    // Atomic write: write to temp, then rename
    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

    std::fs::rename(&temp_path, &config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}
