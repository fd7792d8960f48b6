// src/filter/taxonomy.rs
//! Fixed, ordered lists of individually named boolean-like query keys
//! (industry taxonomy leaves and the like), loaded from TOML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::decode::OptionalInt;
use super::params::ParamSource;

const EMBEDDED_FLAG_GROUPS: &str = include_str!("../../config/flag_groups.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub key: String,
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagGroup {
    pub name: String,
    pub flags: Vec<Flag>,
}

impl FlagGroup {
    /// One entry per flag in declared order: a missing or empty value is
    /// `Absent`, anything else is `Present(code)`.
    pub fn decode<S: ParamSource + ?Sized>(&self, source: &S) -> Vec<OptionalInt> {
        self.flags
            .iter()
            .map(|flag| match source.get(&flag.key) {
                Some(v) if !v.is_empty() => OptionalInt::Present(flag.code),
                _ => OptionalInt::Absent,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagTaxonomy {
    #[serde(default)]
    pub groups: Vec<FlagGroup>,
}

impl FlagTaxonomy {
    /// Taxonomy shipped with the binary (`config/flag_groups.toml`).
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_FLAG_GROUPS).context("Failed to parse embedded flag groups")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read flag groups: {}", path.display()))?;
        let taxonomy = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse flag groups: {}", path.display()))?;

        info!(
            "Loaded {} flag group(s) from {}",
            taxonomy.groups.len(),
            path.display()
        );
        Ok(taxonomy)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let taxonomy: FlagTaxonomy = toml::from_str(content)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn group(&self, name: &str) -> Option<&FlagGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                anyhow::bail!("Duplicate flag group: {}", group.name);
            }

            let mut keys = HashSet::new();
            for flag in &group.flags {
                if flag.key.is_empty() {
                    anyhow::bail!("Empty flag key in group {}", group.name);
                }
                if !keys.insert(flag.key.as_str()) {
                    anyhow::bail!("Duplicate flag key {} in group {}", flag.key, group.name);
                }
            }
        }
        Ok(())
    }
}
