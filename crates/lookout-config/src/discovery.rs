//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/lookout/config.toml` (or `$LOOKOUT_CONFIG_DIR/config.toml`)
//! 2. `./lookout.toml` (project-local)
//! 3. CLI arguments (handled externally)

use std::path::{Path, PathBuf};

use crate::{ConfigError, LookoutConfig, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "lookout.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "lookout";

/// Environment variable to override the config directory.
pub const CONFIG_DIR_ENV: &str = "LOOKOUT_CONFIG_DIR";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: LookoutConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
    /// Warnings generated during loading (unreadable layers, plaintext keys).
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration by discovering and merging all config layers.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `config_dir` overrides both `LOOKOUT_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut config = LookoutConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    for path in search_order(project_dir, config_dir) {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    check_plaintext_keys(&config, &mut warnings);

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Config file paths in the order they are applied (lowest precedence first).
pub fn search_order(project_dir: Option<&Path>, config_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);

    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_path(),
    };
    paths.extend(user_config_path);

    paths.push(
        project_dir
            .map(|d| d.join(PROJECT_CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE)),
    );
    paths
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<LookoutConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    LookoutConfig::from_toml(&contents)
}

/// Get the user config file path.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the config directory for lookout.
///
/// Checks `LOOKOUT_CONFIG_DIR` first, then falls back to the platform default
/// (`~/.config/lookout` on Linux).
pub fn xdg_config_dir() -> Option<PathBuf> {
    xdg_config_dir_with(|key| std::env::var(key).ok())
}

/// Like [`xdg_config_dir`] with an injected environment lookup.
pub fn xdg_config_dir_with(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(dir) = lookup(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Try to load a config file and merge it into the existing config.
///
/// Missing files are skipped; unreadable or invalid files become warnings.
fn load_layer(config: &mut LookoutConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

/// Check for plaintext API keys in the config and emit warnings.
fn check_plaintext_keys(config: &LookoutConfig, warnings: &mut Vec<String>) {
    if let Some(ref search) = config.search
        && search.has_plaintext_api_key()
    {
        warnings.push(format!(
            "[search] contains a plaintext API key. \
             Consider setting the {} environment variable instead.",
            search.backend().env_var()
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_dir_env_override() {
        let dir = xdg_config_dir_with(|key| {
            (key == CONFIG_DIR_ENV).then(|| "/tmp/lookout-test-config".to_string())
        });
        assert_eq!(dir, Some(PathBuf::from("/tmp/lookout-test-config")));
    }

    #[test]
    fn test_config_dir_empty_env_falls_back() {
        let dir = xdg_config_dir_with(|_| Some(String::new()));
        if let Some(d) = dir {
            assert!(d.ends_with("lookout"));
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_no_files() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
        assert!(loaded.config.search.is_none());
        assert!(loaded.loaded_from().is_empty());
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.sources.len(), 2);
    }

    #[test]
    fn test_load_config_layered_merge() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            user.path().join("config.toml"),
            "[search]\nendpoint = \"https://search.internal/api\"\nmax_results = 10\n",
        )
        .unwrap();
        fs::write(
            project.path().join("lookout.toml"),
            "[search]\nmax_results = 6\n",
        )
        .unwrap();

        let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
        let search = loaded.config.search();
        assert_eq!(search.endpoint.as_deref(), Some("https://search.internal/api"));
        assert_eq!(search.max_results(), 6);
        assert_eq!(loaded.loaded_from().len(), 2);
    }

    #[test]
    fn test_invalid_layer_becomes_warning() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(user.path().join("config.toml"), "[search\nbroken").unwrap();
        fs::write(
            project.path().join("lookout.toml"),
            "[search]\nmax_results = 4\n",
        )
        .unwrap();

        let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("Failed to load"));
        assert_eq!(loaded.config.search().max_results(), 4);
        assert_eq!(loaded.loaded_from().len(), 1);
    }

    #[test]
    fn test_plaintext_key_warning() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("lookout.toml"),
            "[search]\napi_key = \"tvly-plain\"\n",
        )
        .unwrap();

        let loaded = load_config_with_options(Some(project.path()), Some(user.path())).unwrap();
        assert!(
            loaded
                .warnings
                .iter()
                .any(|w| w.contains("plaintext") && w.contains("TAVILY_API_KEY"))
        );
    }

    #[test]
    fn test_search_order() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let order = search_order(Some(project.path()), Some(user.path()));
        assert_eq!(
            order,
            vec![
                user.path().join("config.toml"),
                project.path().join("lookout.toml")
            ]
        );
    }
}
