//! Configuration types and parsing for sweep.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Annotation names that mark auto-generated date tables
pub const SYSTEM_DATE_ANNOTATIONS: [&str; 2] = ["__PBI_TemplateDateTable", "__PBI_LocalDateTable"];

/// Analysis configuration from sweep.yml
///
/// Every field has a default, so an absent config file behaves the same as
/// an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Layout scan settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Formula dependency settings
    #[serde(default)]
    pub formulas: FormulaConfig,
}

/// Schema catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Annotation names that exclude a table when set to "true"
    #[serde(default = "default_system_date_annotations")]
    pub system_date_annotations: Vec<String>,

    /// Skip internal `rowNumber` columns
    #[serde(default)]
    pub skip_row_number_columns: bool,
}

impl CatalogConfig {
    /// Whether an annotation name marks a system date table
    pub fn is_system_date_annotation(&self, name: &str) -> bool {
        self.system_date_annotations
            .iter()
            .any(|a| a.trim() == name.trim())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            system_date_annotations: default_system_date_annotations(),
            skip_row_number_columns: false,
        }
    }
}

/// Layout scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Scan the report-level `filters` payload in addition to page and visual filters
    #[serde(default = "default_true")]
    pub scan_report_filters: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scan_report_filters: true,
        }
    }
}

/// How an unqualified `[Name]` reference in a formula resolves to measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnqualifiedPolicy {
    /// Every measure with that name, in any table
    #[default]
    AnyTable,
    /// Only when exactly one measure in the model has that name
    UniqueOnly,
}

/// Formula dependency settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulaConfig {
    /// Resolution policy for unqualified measure references
    #[serde(default)]
    pub unqualified: UnqualifiedPolicy,

    /// Also resolve unqualified `[X]` to column X of the formula's own table
    #[serde(default)]
    pub same_table_columns: bool,

    /// Count every reference found in any formula as direct usage
    #[serde(default)]
    pub seed_all_references: bool,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            unqualified: UnqualifiedPolicy::AnyTable,
            same_table_columns: false,
            seed_all_references: false,
        }
    }
}

fn default_system_date_annotations() -> Vec<String> {
    SYSTEM_DATE_ANNOTATIONS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        // An empty file deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, falling back to defaults.
    ///
    /// Looks for sweep.yml or sweep.yaml.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("sweep.yml");
        let yaml_path = dir.join("sweep.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self
            .catalog
            .system_date_annotations
            .iter()
            .any(|a| a.trim().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: "catalog.system_date_annotations must not contain empty names"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
