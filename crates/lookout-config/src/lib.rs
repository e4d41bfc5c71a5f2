//! Configuration system for Lookout.
//!
//! Provides TOML-based configuration with:
//! - Search provider settings (`[search]`)
//! - Log output settings (`[logging]`)
//! - Config file layering (user config dir + project-local overrides)
//! - API key resolution (env var → config file)

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigSource, LoadedConfig, load_config, load_config_file,
    load_config_with_options, search_order, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use secrets::{
    ResolvedSecret, SecretSource, require_api_key, resolve_api_key, resolve_api_key_with,
};
pub use types::*;
