//! Configuration file loader with multi-source merging.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::PathBuf;

use super::file_config::FileConfig;

/// Configuration loader that handles file discovery and merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority.
    ///
    /// Priority (highest to lowest):
    /// 1. `PRISM_*` environment variables, section and key separated by a
    ///    double underscore (e.g. `PRISM_SECURITY__POLICY`,
    ///    `PRISM_SECURITY__ASSUME_YES`, `PRISM_TELEMETRY__ENABLED`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./prism.toml` or `./.prism.toml`
    /// 4. XDG config: `~/.config/prism/config.toml`
    /// 5. Default values
    ///
    /// This runs exactly once at startup; the resolved values travel
    /// through the pipeline as a `PipelineConfig`, never re-read.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        for filename in &["prism.toml", ".prism.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // PRISM_SECURITY__POLICY -> security.policy, etc.
        figment = figment.merge(Env::prefixed("PRISM_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for `--no-config`).
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("prism").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists).
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["prism.toml", ".prism.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Describe the config source chain (for `prism config show`).
    pub fn describe_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push("Configuration sources (in priority order):".to_string());
        lines.push("  [  env] PRISM_* environment variables (PRISM_SECTION__KEY)".to_string());

        match explicit {
            Some(path) if path.exists() => {
                lines.push(format!("  [FOUND] Explicit: {}", path.display()));
            }
            Some(path) => lines.push(format!("  [     ] Explicit: {}", path.display())),
            None => {}
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./prism.toml or ./.prism.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", marker, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.security.policy, "standard");
        assert!(config.telemetry.enabled);
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
            [security]
            policy = "strict"

            [telemetry]
            retention_days = 3
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.security.policy, "strict");
        assert_eq!(config.telemetry.retention_days, 3);
        // Defaults still fill the rest.
        assert_eq!(config.app.name, "prism");
    }

    #[test]
    fn test_global_config_path_mentions_prism() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("prism"));
    }

    #[test]
    fn test_describe_sources_shape() {
        let lines = ConfigLoader::describe_sources(None);
        assert!(lines[0].contains("priority order"));
        assert!(lines.iter().any(|l| l.contains("PRISM_")));
        assert!(lines.iter().any(|l| l.contains("Default")));
    }
}
