//! Configuration module for tikstalk.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Quality and conversion preset catalogs
//! - Configuration validation
//! - Picking up config edits while monitoring

pub mod loader;
pub mod presets;
pub mod reload;
pub mod validation;

pub use loader::{
    default_config_path, default_state_path, Config, OptionsConfig, StateConfig, TargetConfig,
    ToolsConfig,
};
pub use presets::{ConversionPreset, ConversionProfile, QualityPreset};
pub use reload::watch_config;
pub use validation::{parse_handle, validate_config};
