//! offergrid.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::Strategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ManagerConfig {
    #[serde(default)]
    pub allocator: AllocatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AllocatorConfig {
    #[serde(default)]
    pub filter_mode: FilterMode,
    /// Strategy applied to tasks that registered none.
    #[serde(default)]
    pub default_strategy: Strategy,
}

/// How registered attribute filters are evaluated against offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// The first term of every filter, whatever its kind, is compared
    /// against the offer's text attributes. Non-text attributes are never
    /// inspected, but any registered filter still gates admission.
    #[default]
    TextOnly,
    /// Every filter kind is evaluated against attributes of the same kind.
    Full,
}

impl ManagerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
