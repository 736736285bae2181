//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::{AppConfig, ConfigOverrides};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".awslog.yaml",
    ".awslog.yml",
    "awslog.yaml",
    "awslog.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/awslog/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Config file {} does not exist, searching defaults", path.display());
    }

    // 2. Search current directory
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    // 3. Search git root (if in a repo)
    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    // 4. Search user config directory
    if let Some(path) = dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("awslog")))
    {
        return Some(path);
    }

    // 5. Search home directory
    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// First of [`CONFIG_FILE_NAMES`] present in `dir`.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Nearest ancestor of the working directory that holds a `.git` entry.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Why a config file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("no config file at {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid YAML in config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Apply command-line values over this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if overrides.region.is_some() {
            self.aws.region.clone_from(&overrides.region);
        }
        if overrides.profile.is_some() {
            self.aws.profile.clone_from(&overrides.profile);
        }
        if overrides.endpoint_url.is_some() {
            self.aws.endpoint_url.clone_from(&overrides.endpoint_url);
        }
        if let Some(number) = overrides.number {
            self.history.number = number;
        }
        if let Some(context) = overrides.context {
            self.history.context = context;
        }

        // Flags can only switch behaviour on
        if overrides.include_deleted {
            self.history.include_deleted = true;
        }
        if overrides.sort_lists {
            self.history.sort_lists = true;
        }
        if overrides.no_color {
            self.output.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.apply_overrides(overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# awslog configuration
# Place this file at .awslog.yaml in your project root or ~/.config/awslog/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# awslog Configuration File
# ==========================
#
# Place it at:
#   - .awslog.yaml in your project root
#   - ~/.config/awslog/awslog.yaml for global config
#
# CLI arguments always override file settings.

# AWS connection
aws:
  # Region (default: AWS_REGION, AWS_DEFAULT_REGION, then ~/.aws/config)
  # region: eu-west-1
  # Profile in ~/.aws/credentials and ~/.aws/config
  # profile: default
  # Endpoint override, e.g. LocalStack
  # endpoint_url: http://localhost:4566
  timeout_secs: 30
  # Items per request, 1-100
  page_size: 100

# History and diff
history:
  # Number of changes to show
  number: 1
  # Context lines around each change
  context: 10
  # Also look up resources that have been deleted
  include_deleted: false
  # Sort list elements before diffing (hides reordering-only changes)
  sort_lists: false

# Output
output:
  # Disable colored output (NO_COLOR is honoured too)
  no_color: false

# Date/time parsing
time:
  # Timezone for --before/--after values without an offset: local, utc
  naive_timezone: local
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".awslog.yaml");
        std::fs::write(&config_path, "history:\n  number: 2\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_prefers_dotfile() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("awslog.yml"), "").unwrap();
        std::fs::write(tmp.path().join(".awslog.yml"), "").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(tmp.path().join(".awslog.yml")));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
aws:
  region: eu-west-1
  page_size: 50
history:
  number: 3
  sort_lists: true
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.aws.page_size, 50);
        assert_eq!(config.history.number, 3);
        assert!(config.history.sort_lists);
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();
        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "history:\n  number: lots\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig::default();
        config.aws.region = Some("us-east-1".to_string());
        config.history.sort_lists = true;

        config.apply_overrides(&ConfigOverrides {
            region: Some("eu-west-1".to_string()),
            number: Some(4),
            no_color: true,
            ..ConfigOverrides::default()
        });

        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.history.number, 4);
        assert_eq!(config.history.context, 10);
        assert!(config.history.sort_lists, "unset flag keeps file value");
        assert!(config.output.no_color);
    }

    #[test]
    fn test_generate_example_config_parses() {
        let example = generate_example_config();
        assert!(example.contains("history:"));
        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_full_example_config_parses_to_defaults() {
        let parsed: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_explicit_path_wins_discovery() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("team.yml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "history:\n  number: 2").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }

    #[test]
    fn test_parse_error_message() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "aws: [").unwrap();
        let err = load_config_file(&config_path).unwrap_err();
        assert!(err.to_string().starts_with("invalid YAML in config file"));
    }
}
