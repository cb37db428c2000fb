use crate::error::{CampaignError, Result};
use crate::paths;
use crate::types::Frequency;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// DefaultsConfig
// ---------------------------------------------------------------------------

/// Values a new action starts with when the caller leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_duration_days")]
    pub duration_days: u64,
    #[serde(default)]
    pub frequency: Frequency,
}

fn default_duration_days() -> u64 {
    crate::action::DEFAULT_DURATION_DAYS
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            duration_days: default_duration_days(),
            frequency: Frequency::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    paths::DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReportConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_file")]
    pub file_name: String,
    #[serde(default = "default_report_title")]
    pub title: String,
}

fn default_report_file() -> String {
    paths::DEFAULT_REPORT_FILE.to_string()
}

fn default_report_title() -> String {
    "Plano Anual de Marketing".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_name: default_report_file(),
            title: default_report_title(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    /// Role names offered for `responsible`. Advisory: other names are kept
    /// but reported.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_version() -> u32 {
    1
}

pub fn default_roles() -> Vec<String> {
    [
        "Gerente de E-commerce",
        "Gerente de Marketing Digital",
        "Analista de Mídia",
        "Social Media",
        "Analista de E-commerce",
        "Produtor de Conteúdo",
        "Analista de SEO",
        "Analista de Redes Sociais",
        "Analista de Conteúdo",
        "Atendente de Vendas/SAC",
        "Assistente de Logística",
        "Web Designer",
        "Desenvolvedor",
        "Analista de BI",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            roles: default_roles(),
            defaults: DefaultsConfig::default(),
            storage: StorageConfig::default(),
            report: ReportConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CampaignError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn is_known_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r == name)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Why `storage.key` cannot name a file inside `.campaign/`, if it can't.
    pub fn storage_key_problem(&self) -> Option<String> {
        let key = &self.storage.key;
        if key.trim().is_empty() {
            Some("storage.key is empty".to_string())
        } else if key.contains(['/', '\\']) {
            Some(format!("storage.key '{key}' must not contain path separators"))
        } else {
            None
        }
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let warn = |level: WarnLevel, message: String| ConfigWarning { level, message };

        if self.roles.is_empty() {
            warnings.push(warn(
                WarnLevel::Warning,
                "roles is empty: every responsible will be reported as unknown".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for role in &self.roles {
            if role.trim().is_empty() {
                warnings.push(warn(WarnLevel::Warning, "roles contains a blank entry".to_string()));
            } else if !seen.insert(role.as_str()) {
                warnings.push(warn(
                    WarnLevel::Warning,
                    format!("role '{role}' is listed more than once"),
                ));
            }
        }

        if self.defaults.duration_days == 0 {
            warnings.push(warn(
                WarnLevel::Warning,
                "defaults.duration_days is 0: new actions will start and end on the same day"
                    .to_string(),
            ));
        }

        if let Some(problem) = self.storage_key_problem() {
            warnings.push(warn(WarnLevel::Error, problem));
        }

        if self.report.file_name.trim().is_empty() {
            warnings.push(warn(WarnLevel::Error, "report.file_name is empty".to_string()));
        } else if !self.report.file_name.to_lowercase().ends_with(".pdf") {
            warnings.push(warn(
                WarnLevel::Warning,
                format!("report.file_name '{}' does not end in .pdf", self.report.file_name),
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("cosmeticos");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "cosmeticos");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.roles.len(), 14);
        assert_eq!(parsed.report.file_name, "plano-marketing-anual.pdf");
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("project:\n  name: loja\n").unwrap();
        assert_eq!(cfg.defaults.duration_days, 7);
        assert_eq!(cfg.storage.key, "marketingActions");
        assert!(cfg.is_known_role("Web Designer"));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn load_uninitialized_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CampaignError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("loja");
        cfg.roles = vec!["CMO".to_string()];
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.roles, vec!["CMO".to_string()]);
    }

    #[test]
    fn validate_flags_problems() {
        let mut cfg = Config::new("loja");
        cfg.roles = vec!["CMO".to_string(), "CMO".to_string()];
        cfg.defaults.duration_days = 0;
        cfg.storage.key = "../escape".to_string();
        cfg.report.file_name = "plan.txt".to_string();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }

    #[test]
    fn storage_key_must_stay_inside_the_plan_dir() {
        let mut cfg = Config::new("loja");
        assert_eq!(cfg.storage_key_problem(), None);

        cfg.storage.key = "..\\outside".to_string();
        assert!(cfg.storage_key_problem().unwrap().contains("path separators"));

        cfg.storage.key = "  ".to_string();
        assert_eq!(cfg.storage_key_problem().as_deref(), Some("storage.key is empty"));
    }
}
