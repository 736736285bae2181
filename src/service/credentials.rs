//! Credential and region discovery.
//!
//! Follows the usual AWS CLI precedence, minus the parts that need other
//! services (SSO, instance metadata, assume-role): environment variables
//! first, then the shared credentials and config files.

use crate::error::{AwslogError, ErrorContext, Result, UpstreamErrorKind};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_PROFILE: &str = "default";

/// Static AWS credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    /// Load credentials from the process environment and shared files.
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_with(profile, &|key| std::env::var(key).ok())
    }

    /// Load credentials using `env` to look up environment variables.
    pub fn load_with(profile: Option<&str>, env: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(credentials) = Self::from_env(env) {
            tracing::debug!("Using credentials from environment");
            return Ok(credentials);
        }

        let profile = profile_name(profile, env);
        if let Some(path) = shared_file(env, "AWS_SHARED_CREDENTIALS_FILE", "credentials") {
            if let Some(credentials) = Self::from_shared_file(&path, &profile)? {
                tracing::debug!("Using credentials for profile '{}' from {}", profile, path.display());
                return Ok(credentials);
            }
        }

        Err(AwslogError::upstream(
            "loading credentials",
            UpstreamErrorKind::Credentials(format!(
                "set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or add profile '{profile}' to the shared credentials file"
            )),
        ))
    }

    fn from_env(env: &dyn Fn(&str) -> Option<String>) -> Option<Self> {
        let access_key_id = env("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty())?;
        let secret_access_key = env("AWS_SECRET_ACCESS_KEY").filter(|v| !v.is_empty())?;
        let session_token = env("AWS_SESSION_TOKEN").filter(|v| !v.is_empty());
        Some(Self::new(access_key_id, secret_access_key, session_token))
    }

    /// Read a profile from a shared credentials file.
    ///
    /// Returns `Ok(None)` when the file or the profile does not exist.
    pub fn from_shared_file(path: &Path, profile: &str) -> Result<Option<Self>> {
        let Some(sections) = read_ini(path)? else {
            return Ok(None);
        };
        let Some(section) = sections.get(profile) else {
            return Ok(None);
        };

        match (
            section.get("aws_access_key_id"),
            section.get("aws_secret_access_key"),
        ) {
            (Some(key), Some(secret)) => Ok(Some(Self::new(
                key.clone(),
                secret.clone(),
                section.get("aws_session_token").cloned(),
            ))),
            _ => Ok(None),
        }
    }
}

/// Determine the region to talk to.
///
/// Order: explicit value, `AWS_REGION`, `AWS_DEFAULT_REGION`, then the
/// profile's `region` in the shared config file.
pub fn resolve_region(explicit: Option<&str>, profile: Option<&str>) -> Result<String> {
    resolve_region_with(explicit, profile, &|key| std::env::var(key).ok())
}

pub(crate) fn resolve_region_with(
    explicit: Option<&str>,
    profile: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<String> {
    if let Some(region) = explicit.filter(|r| !r.is_empty()) {
        return Ok(region.to_string());
    }
    for key in ["AWS_REGION", "AWS_DEFAULT_REGION"] {
        if let Some(region) = env(key).filter(|r| !r.is_empty()) {
            return Ok(region);
        }
    }

    let profile = profile_name(profile, env);
    if let Some(path) = shared_file(env, "AWS_CONFIG_FILE", "config") {
        if let Some(sections) = read_ini(&path)? {
            let section_name = if profile == DEFAULT_PROFILE {
                DEFAULT_PROFILE.to_string()
            } else {
                format!("profile {profile}")
            };
            if let Some(region) = sections.get(&section_name).and_then(|s| s.get("region")) {
                return Ok(region.clone());
            }
        }
    }

    Err(AwslogError::config(
        "no AWS region configured (use --region, AWS_REGION or the shared config file)",
    ))
}

fn profile_name(explicit: Option<&str>, env: &dyn Fn(&str) -> Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| env("AWS_PROFILE"))
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

fn shared_file(
    env: &dyn Fn(&str) -> Option<String>,
    override_var: &str,
    file_name: &str,
) -> Option<PathBuf> {
    env(override_var)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".aws").join(file_name)))
}

type IniSections = HashMap<String, HashMap<String, String>>;

fn read_ini(path: &Path) -> Result<Option<IniSections>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| AwslogError::io(path, e))
        .context("reading shared AWS file")?;
    Ok(Some(parse_ini(&content)))
}

/// Parse the INI dialect used by `~/.aws/credentials` and `~/.aws/config`.
fn parse_ini(content: &str) -> IniSections {
    let mut sections = IniSections::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_ini_sections() {
        let sections = parse_ini(
            "# comment\n[default]\naws_access_key_id = AKID\n\n[profile dev]\nregion=eu-west-1\n",
        );
        assert_eq!(sections["default"]["aws_access_key_id"], "AKID");
        assert_eq!(sections["profile dev"]["region"], "eu-west-1");
    }

    #[test]
    fn test_env_credentials_win() {
        let env = env_from(&[
            ("AWS_ACCESS_KEY_ID", "AKIDENV"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "token"),
        ]);
        let credentials = Credentials::load_with(None, &env).unwrap();
        assert_eq!(credentials.access_key_id, "AKIDENV");
        assert_eq!(credentials.session_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_shared_file_profile() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credentials");
        std::fs::write(
            &path,
            "[default]\naws_access_key_id = AKIDDEFAULT\naws_secret_access_key = s1\n\
             [ops]\naws_access_key_id = AKIDOPS\naws_secret_access_key = s2\n",
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();
        let env = env_from(&[("AWS_SHARED_CREDENTIALS_FILE", path_str.as_str())]);

        let default = Credentials::load_with(None, &env).unwrap();
        assert_eq!(default.access_key_id, "AKIDDEFAULT");

        let ops = Credentials::load_with(Some("ops"), &env).unwrap();
        assert_eq!(ops.access_key_id, "AKIDOPS");
        assert_eq!(ops.secret_access_key, "s2");
    }

    #[test]
    fn test_missing_credentials_is_upstream_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope").to_string_lossy().to_string();
        let env = env_from(&[("AWS_SHARED_CREDENTIALS_FILE", missing.as_str())]);
        let err = Credentials::load_with(None, &env).unwrap_err();
        assert!(matches!(
            err,
            AwslogError::Upstream {
                source: UpstreamErrorKind::Credentials(_),
                ..
            }
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("AKID", "very-secret", Some("tok".into()));
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("tok\""));
    }

    #[test]
    fn test_region_precedence() {
        let env = env_from(&[("AWS_REGION", "us-west-2"), ("AWS_DEFAULT_REGION", "us-east-1")]);
        assert_eq!(resolve_region_with(Some("eu-north-1"), None, &env).unwrap(), "eu-north-1");
        assert_eq!(resolve_region_with(None, None, &env).unwrap(), "us-west-2");
    }

    #[test]
    fn test_region_from_profile_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config");
        std::fs::write(&path, "[default]\nregion = us-east-2\n[profile dev]\nregion = ap-south-1\n")
            .unwrap();
        let path_str = path.to_string_lossy().to_string();
        let env = env_from(&[("AWS_CONFIG_FILE", path_str.as_str())]);

        assert_eq!(resolve_region_with(None, None, &env).unwrap(), "us-east-2");
        assert_eq!(resolve_region_with(None, Some("dev"), &env).unwrap(), "ap-south-1");
    }

    #[test]
    fn test_no_region_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope").to_string_lossy().to_string();
        let env = env_from(&[("AWS_CONFIG_FILE", missing.as_str())]);
        assert!(matches!(
            resolve_region_with(None, None, &env),
            Err(AwslogError::Config(_))
        ));
    }
}
