//! The poncho spec document.
//!
//! ```json
//! {
//!   "conda": { "channels": ["conda-forge"], "dependencies": ["python=3.10", {"pip": ["ndcctools"]}] },
//!   "git":   { "tools": { "remote": "https://github.com/org/tools.git", "ref": "main" } },
//!   "http":  { "data":  { "url": "https://example.org/data.tar.gz", "type": "tar", "compression": "gzip" } }
//! }
//! ```
//!
//! Every top-level key is optional. The legacy layout uses `conda.packages`
//! plus a top-level `pip` list instead of `conda.dependencies`.

use std::path::Path;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PackError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PonchoSpec {
    #[serde(default)]
    pub conda: Option<CondaSection>,
    /// Legacy top-level pip requirements, only read when `conda.dependencies` is absent.
    #[serde(default)]
    pub pip: Vec<String>,
    /// Entries in document order.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub git: Vec<(String, GitSource)>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub http: Vec<(String, HttpSource)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CondaSection {
    #[serde(default)]
    pub channels: Option<Vec<String>>,
    /// New layout. When present, `packages` and the top-level `pip` are ignored.
    #[serde(default)]
    pub dependencies: Option<Vec<Dependency>>,
    #[serde(default)]
    pub packages: Vec<String>,
}

/// One entry of `conda.dependencies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    /// `"numpy>=1.20"`
    Package(String),
    /// `{"pip": ["requests", "mylib==0.3"]}`
    Pip { pip: Vec<String> },
    /// Anything else is handed to conda as written.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GitSource {
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HttpSource {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub compression: Option<String>,
}

impl PonchoSpec {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PackError::io(format!("Read spec file {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|source| PackError::InvalidSpec {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl std::str::FromStr for PonchoSpec {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

/// Deserialize a JSON object into `(key, value)` pairs, keeping key order.
fn ordered_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let map = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?
        .unwrap_or_default();
    map.into_iter()
        .map(|(k, v)| {
            serde_json::from_value(v)
                .map(|t| (k.clone(), t))
                .map_err(|e| D::Error::custom(format!("entry '{}': {}", k, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let spec: PonchoSpec = "{}".parse().unwrap();
        assert!(spec.conda.is_none());
        assert!(spec.pip.is_empty());
        assert!(spec.git.is_empty());
        assert!(spec.http.is_empty());
    }

    #[test]
    fn test_dependency_shapes() {
        let spec: PonchoSpec = r#"{"conda": {"dependencies": [
            "python=3.10",
            {"pip": ["requests"]},
            {"channel": "odd"}
        ]}}"#
            .parse()
            .unwrap();
        let deps = spec.conda.unwrap().dependencies.unwrap();
        assert_eq!(deps[0], Dependency::Package("python=3.10".to_string()));
        assert_eq!(
            deps[1],
            Dependency::Pip {
                pip: vec!["requests".to_string()]
            }
        );
        assert!(matches!(deps[2], Dependency::Other(_)));
    }

    #[test]
    fn test_sections_keep_document_order() {
        let spec: PonchoSpec = r#"{
            "git": {"zeta": {"remote": "z"}, "alpha": {"remote": "a", "ref": "v1"}},
            "http": {"b": {"url": "u", "type": "tar"}, "a": {}}
        }"#
        .parse()
        .unwrap();
        let git: Vec<&str> = spec.git.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(git, vec!["zeta", "alpha"]);
        assert_eq!(spec.git[1].1.git_ref.as_deref(), Some("v1"));
        let http: Vec<&str> = spec.http.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(http, vec!["b", "a"]);
        assert_eq!(spec.http[0].1.file_type.as_deref(), Some("tar"));
        assert!(spec.http[1].1.url.is_none());
    }

    #[test]
    fn test_from_file_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = PonchoSpec::from_file(&path).unwrap_err();
        assert!(matches!(err, PackError::InvalidSpec { .. }));
    }
}
