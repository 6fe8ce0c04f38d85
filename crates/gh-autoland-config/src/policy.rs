//! Per-repository autoapprove/automerge policies
//!
//! The policy file is either YAML (a bare list of entries) or TOML
//! (`[[policy]]` tables). The format is picked from the file extension.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default policy file, looked up in the working directory
pub const DEFAULT_POLICY_FILE: &str = "config.yaml";

/// Policy entry for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Repository name (without owner), e.g. "hello-world"
    pub repository: String,

    /// Submit an approving review once checks are complete
    #[serde(default)]
    pub autoapprove: bool,

    /// Ask dependabot to merge once checks are complete
    #[serde(default)]
    pub automerge: bool,
}

impl Policy {
    pub fn new(repository: impl Into<String>, autoapprove: bool, automerge: bool) -> Self {
        Self {
            repository: repository.into(),
            autoapprove,
            automerge,
        }
    }
}

/// Ordered, read-only set of policy entries
///
/// Built once at startup and shared between concurrent deliveries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyTable {
    policies: Vec<Policy>,
}

#[derive(Debug, Deserialize)]
struct TomlPolicyFile {
    #[serde(default)]
    policy: Vec<Policy>,
}

impl PolicyTable {
    pub fn new(policies: Vec<Policy>) -> Self {
        let mut seen = HashSet::new();
        for policy in &policies {
            if !seen.insert(policy.repository.as_str()) {
                log::warn!(
                    "Repository '{}' has more than one policy entry; all of them will be applied",
                    policy.repository
                );
            }
        }
        Self { policies }
    }

    /// Parse a YAML policy list
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let policies: Vec<Policy> =
            serde_yaml::from_str(content).context("Failed to parse YAML policy list")?;
        Ok(Self::new(policies))
    }

    /// Parse a TOML policy file made of `[[policy]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TomlPolicyFile =
            toml::from_str(content).context("Failed to parse TOML policy file")?;
        Ok(Self::new(file.policy))
    }

    /// Load policies from a file, choosing the format from its extension
    ///
    /// `.toml` files are parsed as TOML, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let table = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| format!("Invalid policy file {}", path.display()))?;

        log::info!(
            "Loaded {} policy entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Every entry for the given repository name, in file order
    pub fn matching<'a>(&'a self, repository: &'a str) -> impl Iterator<Item = &'a Policy> + 'a {
        self.policies
            .iter()
            .filter(move |policy| policy.repository == repository)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl FromIterator<Policy> for PolicyTable {
    fn from_iter<I: IntoIterator<Item = Policy>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_policy_list() {
        let yaml = r#"
- repository: api
  autoapprove: true
  automerge: true
- repository: web
  autoapprove: true
"#;
        let table = PolicyTable::from_yaml_str(yaml).unwrap();
        assert_eq!(table.len(), 2);

        let web: Vec<_> = table.matching("web").collect();
        assert_eq!(web, vec![&Policy::new("web", true, false)]);
    }

    #[test]
    fn test_empty_yaml_is_empty_table() {
        let table = PolicyTable::from_yaml_str("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_toml_policy_tables() {
        let toml = r#"
            [[policy]]
            repository = "api"
            automerge = true

            [[policy]]
            repository = "web"
            autoapprove = true
        "#;
        let table = PolicyTable::from_toml_str(toml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.matching("api").next().unwrap(),
            &Policy::new("api", false, true)
        );
    }

    #[test]
    fn test_duplicate_entries_are_all_matched_in_order() {
        let table: PolicyTable = vec![
            Policy::new("api", true, false),
            Policy::new("web", true, true),
            Policy::new("api", false, true),
        ]
        .into_iter()
        .collect();

        let api: Vec<_> = table.matching("api").collect();
        assert_eq!(api.len(), 2);
        assert!(api[0].autoapprove && !api[0].automerge);
        assert!(!api[1].autoapprove && api[1].automerge);
    }

    #[test]
    fn test_matching_is_exact() {
        let table = PolicyTable::new(vec![Policy::new("api", true, true)]);
        assert_eq!(table.matching("API").count(), 0);
        assert_eq!(table.matching("api-v2").count(), 0);
    }

    #[test]
    fn test_load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        writeln!(file, "- repository: api\n  automerge: true").unwrap();
        let table = PolicyTable::load(&yaml_path).unwrap();
        assert_eq!(table.matching("api").count(), 1);

        let toml_path = dir.path().join("policies.toml");
        std::fs::write(&toml_path, "[[policy]]\nrepository = \"web\"\n").unwrap();
        let table = PolicyTable::load(&toml_path).unwrap();
        assert_eq!(table.matching("web").count(), 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = PolicyTable::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read policy file"));
    }
}
