use std::fmt;
use std::str::FromStr;

use super::store_error::StoreError;

// ref
//  ├── "sample.csv"          → latest version
//  ├── "sample.csv:latest"   → latest version
//  └── "sample.csv:v3"       → exact version 3

/// A user-supplied reference to a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub version: VersionSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    Latest,
    Exact(i64),
}

impl FromStr for ArtifactRef {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StoreError::BadRef("empty artifact reference".into()));
        }

        let (name, version) = match s.rsplit_once(':') {
            None => (s, VersionSpec::Latest),
            Some((name, "latest")) => (name, VersionSpec::Latest),
            Some((name, tag)) => {
                let number = tag
                    .strip_prefix('v')
                    .and_then(|n| n.parse::<i64>().ok())
                    .filter(|n| *n >= 0);
                match number {
                    Some(n) => (name, VersionSpec::Exact(n)),
                    None => {
                        return Err(StoreError::BadRef(format!(
                            "'{tag}' is not a version (expected 'latest' or 'vN')"
                        )))
                    }
                }
            }
        };

        if name.is_empty() {
            return Err(StoreError::BadRef(format!("'{s}' has an empty name")));
        }

        Ok(ArtifactRef {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            VersionSpec::Latest => write!(f, "{}:latest", self.name),
            VersionSpec::Exact(n) => write!(f, "{}:v{n}", self.name),
        }
    }
}

/// One registered artifact version, as stored in the registry.
#[derive(Debug, Clone)]
pub struct ArtifactMeta {
    pub id: i64,
    pub name: String,
    pub version: i64,
    pub kind: String,
    pub description: Option<String>,
    pub file_name: String,
    pub rel_path: String,
    pub sha256: String,
    pub size_bytes: i64,
    pub created_by_run: Option<i64>,
    pub created_at: i64,
}

impl ArtifactMeta {
    /// Human-readable qualified name, e.g. `sample.csv:v2`.
    pub fn qualified_name(&self) -> String {
        format!("{}:v{}", self.name, self.version)
    }
}
