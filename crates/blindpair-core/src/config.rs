use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_DB: &str = ".blindpair/eval.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_db")]
    pub db: PathBuf,
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            db: default_db(),
            sampling: SamplingSettings::default(),
            report: ReportSettings::default(),
            log_level: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Fixed seed for reproducible sampling. Unset means fresh entropy per draw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_format")]
    pub format: ReportFormat,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Text,
    Json,
    Md,
}

impl std::str::FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Md),
            other => Err(ConfigError(format!(
                "unknown report format '{}' (expected text|json|md)",
                other
            ))),
        }
    }
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

fn default_db() -> PathBuf {
    PathBuf::from(DEFAULT_DB)
}

fn default_format() -> ReportFormat {
    ReportFormat::Text
}

/// Loads the YAML config. A missing file yields defaults; unknown keys warn,
/// or fail when `strict`.
pub fn load_config(path: &Path, strict: bool) -> Result<EvalConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(event = "config_defaults", path = %path.display());
        return Ok(EvalConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw, strict)
        .map_err(|e| ConfigError(format!("{} (file: {})", e, path.display())))
}

pub fn parse_config(raw: &str, strict: bool) -> Result<EvalConfig, ConfigError> {
    let mut ignored_keys = std::collections::BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);

    let cfg: EvalConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    let meaningful: Vec<&String> = ignored_keys
        .iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
        .collect();
    if !meaningful.is_empty() {
        if strict {
            return Err(ConfigError(format!(
                "unknown fields detected in strict mode: {:?}",
                meaningful
            )));
        }
        tracing::warn!(event = "config_unknown_fields", fields = ?meaningful);
    }

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }

    Ok(cfg)
}

impl EvalConfig {
    /// Applies `BLINDPAIR_DB`, `BLINDPAIR_SEED` and `BLINDPAIR_LOG`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|k| std::env::var(k).ok());
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("BLINDPAIR_DB").filter(|v| !v.is_empty()) {
            self.db = PathBuf::from(v);
        }
        if let Some(v) = get("BLINDPAIR_SEED") {
            match v.parse() {
                Ok(n) => self.sampling.seed = Some(n),
                Err(_) => tracing::warn!(event = "config_bad_seed", value = %v),
            }
        }
        if let Some(v) = get("BLINDPAIR_LOG") {
            self.log_level = Some(v);
        }
    }
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(
        path,
        r#"version: 1
# SQLite database holding interpretations and evaluations
db: .blindpair/eval.db
# uncomment for reproducible pair sequences
# sampling:
#   seed: 42
report:
  format: text # text | json | md
"#,
    )
    .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_minimal_yaml() {
        let cfg = parse_config("version: 1\n", true).unwrap();
        assert_eq!(cfg, EvalConfig::default());
    }

    #[test]
    fn test_unknown_field_strict_vs_lenient() {
        let raw = "version: 1\nsamplng:\n  seed: 3\n";
        assert!(parse_config(raw, true).is_err());
        let cfg = parse_config(raw, false).unwrap();
        assert_eq!(cfg.sampling.seed, None);

        // underscore and x- prefixed keys are tolerated even in strict mode
        assert!(parse_config("version: 1\n_anchor: 1\nx-note: hi\n", true).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let err = parse_config("version: 7\n", false).unwrap_err();
        assert!(err.0.contains("unsupported config version 7"));
    }

    #[test]
    fn test_sample_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blindpair.yaml");
        write_sample_config(&path).unwrap();
        let cfg = load_config(&path, true).unwrap();
        assert_eq!(cfg.report.format, ReportFormat::Text);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("BLINDPAIR_DB", "/tmp/x.db"),
            ("BLINDPAIR_SEED", "17"),
            ("BLINDPAIR_LOG", "debug"),
        ]
        .into_iter()
        .collect();
        let mut cfg = EvalConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.db, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.sampling.seed, Some(17));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }
}
