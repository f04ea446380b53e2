use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::license::policy::{Policy, PolicyStatus, SENTINEL};

/// Root configuration structure, deserialized from `.license-audit/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// License policy table.
    pub policy: PolicyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct PolicyConfig {
    /// Treat an empty license field as the `N/A` sentinel. Defaults to `true`.
    #[serde(default = "default_empty_as_undetected")]
    pub empty_as_undetected: bool,
    /// License identifier → status (e.g. `"MIT" = "GO"`).
    #[serde(default)]
    pub licenses: BTreeMap<String, PolicyStatus>,
}

fn default_empty_as_undetected() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"debug"` or `"license_audit=trace"`.
    pub level: Option<String>,
}

impl Config {
    /// Validate the policy table into the snapshot used for a run.
    pub fn policy(&self) -> Result<Policy> {
        let policy = Policy::from_table(&self.policy.licenses)
            .context("Invalid policy table")?
            .with_empty_as_undetected(self.policy.empty_as_undetected);
        Ok(policy)
    }
}

impl Default for Config {
    /// Built-in policy used when no config file is found.
    ///
    /// Common permissive licenses are GO, weak copyleft is CAUTION, strong
    /// copyleft is STOP and `NOASSERTION` is UNCLASSIFIED.
    fn default() -> Self {
        let mut licenses = BTreeMap::new();
        for id in [
            "MIT",
            "Apache-2.0",
            "BSD-2-Clause",
            "BSD-3-Clause",
            "ISC",
            "0BSD",
            "Zlib",
            "Unlicense",
            "CC0-1.0",
        ] {
            licenses.insert(id.to_string(), PolicyStatus::Go);
        }
        for id in ["LGPL-2.1", "LGPL-3.0", "MPL-2.0", "EPL-2.0"] {
            licenses.insert(id.to_string(), PolicyStatus::Caution);
        }
        for id in ["GPL-2.0", "GPL-3.0", "AGPL-3.0", "SSPL-1.0"] {
            licenses.insert(id.to_string(), PolicyStatus::Stop);
        }
        licenses.insert("NOASSERTION".to_string(), PolicyStatus::Unclassified);
        licenses.insert(SENTINEL.to_string(), PolicyStatus::Undetected);

        Config {
            policy: PolicyConfig {
                empty_as_undetected: true,
                licenses,
            },
            logging: LoggingConfig::default(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `./.license-audit/config.toml`
/// 3. `~/.config/license-audit/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(work_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = work_dir.join(".license-audit").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-audit")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = Config::default().policy().unwrap();
        assert_eq!(policy.status_of("MIT"), Some(PolicyStatus::Go));
        assert_eq!(policy.status_of("GPL-3.0"), Some(PolicyStatus::Stop));
        assert_eq!(policy.status_of(SENTINEL), Some(PolicyStatus::Undetected));
        assert!(policy.empty_as_undetected());
    }

    #[test]
    fn test_parse_config_file() {
        let content = r#"
[logging]
level = "debug"

[policy]
empty_as_undetected = false

[policy.licenses]
"MIT" = "GO"
"MPL-2.0" = "caution"
"N/A" = "UNDETECTED"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));

        let policy = config.policy().unwrap();
        assert_eq!(policy.entries().len(), 3);
        assert_eq!(policy.status_of("MPL-2.0"), Some(PolicyStatus::Caution));
        assert!(!policy.empty_as_undetected());
    }

    #[test]
    fn test_missing_sentinel_surfaces_before_run() {
        let config: Config = toml::from_str("[policy.licenses]\n\"MIT\" = \"GO\"\n").unwrap();
        let err = config.policy().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuditError>(),
            Some(AuditError::MissingSentinel)
        ));
    }

    #[test]
    fn test_empty_name_surfaces_before_run() {
        let config: Config =
            toml::from_str("[policy.licenses]\n\"\" = \"STOP\"\n\"N/A\" = \"UNDETECTED\"\n").unwrap();
        let err = config.policy().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuditError>(),
            Some(AuditError::EmptyPolicyName)
        ));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let parsed: Result<Config, _> = toml::from_str("[policy.licenses]\n\"MIT\" = \"MAYBE\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_override_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".license-audit");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(
            local.join("config.toml"),
            "[policy.licenses]\n\"N/A\" = \"UNDETECTED\"\n",
        )
        .unwrap();
        let override_path = dir.path().join("custom.toml");
        std::fs::write(
            &override_path,
            "[policy.licenses]\n\"GPL-3.0\" = \"STOP\"\n\"N/A\" = \"UNDETECTED\"\n",
        )
        .unwrap();

        let from_override = load_config(dir.path(), Some(&override_path)).unwrap();
        assert_eq!(from_override.policy.licenses.len(), 2);

        let from_local = load_config(dir.path(), None).unwrap();
        assert_eq!(from_local.policy.licenses.len(), 1);
    }
}
