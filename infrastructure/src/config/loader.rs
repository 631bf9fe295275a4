//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

const PROJECT_FILES: [&str; 2] = ["colloquy.toml", ".colloquy.toml"];

/// Merged file configuration plus the directory relative character
/// references resolve against
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub file: FileConfig,
    pub base_dir: PathBuf,
}

/// One place configuration may come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub path: Option<PathBuf>,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided; must exist)
    /// 2. Project root: `./colloquy.toml` or `./.colloquy.toml`
    /// 3. Global: `$XDG_CONFIG_HOME/colloquy/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.is_file()
        {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }

        let global = Self::global_config_path().filter(|p| p.is_file());
        let project = Self::project_config_path();

        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        if let Some(path) = &global {
            debug!(path = %path.display(), "Merging global config");
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = &project {
            debug!(path = %path.display(), "Merging project config");
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = config_path {
            debug!(path = %path.display(), "Merging explicit config");
            figment = figment.merge(Toml::file(path));
        }

        let file: FileConfig = figment.extract().map_err(Box::new)?;

        // Characters resolve next to the most specific file that was read
        let base_dir = config_path
            .map(Path::to_path_buf)
            .or(project)
            .or(global)
            .map(|p| parent_dir(&p))
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(LoadedConfig { file, base_dir })
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> LoadedConfig {
        LoadedConfig {
            file: FileConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }

    /// `$XDG_CONFIG_HOME/colloquy/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("colloquy").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Config locations in priority order, for `--show-config`
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();
        if let Some(path) = config_path {
            sources.push(ConfigSource {
                label: "Explicit",
                path: Some(path.to_path_buf()),
                found: path.is_file(),
            });
        }
        let project = Self::project_config_path();
        sources.push(ConfigSource {
            label: "Project",
            found: project.is_some(),
            path: project,
        });
        let global = Self::global_config_path();
        sources.push(ConfigSource {
            label: "Global",
            found: global.as_deref().is_some_and(Path::is_file),
            path: global,
        });
        sources.push(ConfigSource {
            label: "Default",
            path: None,
            found: true,
        });
        sources
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let loaded = ConfigLoader::load_defaults();
        assert!(loaded.file.speakers.is_empty());
        assert_eq!(loaded.base_dir, PathBuf::from("."));
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("colloquy"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.toml");
        std::fs::write(
            &path,
            r#"
[conversation]
topic = "Free will"
num_turns = 2

[error_handling]
strategy = "continue"
"#,
        )
        .unwrap();

        let loaded = ConfigLoader::load(Some(path.as_path())).unwrap();

        assert_eq!(loaded.file.conversation.topic.as_deref(), Some("Free will"));
        assert_eq!(loaded.file.conversation.num_turns, 2);
        assert_eq!(loaded.file.error_handling.strategy, "continue");
        // Untouched sections keep their defaults
        assert_eq!(loaded.file.error_handling.max_retries, 3);
        assert_eq!(loaded.file.providers.request_timeout_secs, 60);
        assert_eq!(loaded.base_dir, dir.path());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_invalid_toml_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[conversation\nnum_turns = ").unwrap();

        let err = ConfigLoader::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_sources_list_explicit_first_and_default_last() {
        let sources = ConfigLoader::sources(Some(Path::new("/definitely/missing.toml")));
        assert_eq!(sources.first().unwrap().label, "Explicit");
        assert!(!sources.first().unwrap().found);
        assert_eq!(sources.last().unwrap().label, "Default");
    }

    #[test]
    fn test_parent_dir_of_bare_filename_is_cwd() {
        assert_eq!(parent_dir(Path::new("colloquy.toml")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("conf/colloquy.toml")), PathBuf::from("conf"));
    }
}
