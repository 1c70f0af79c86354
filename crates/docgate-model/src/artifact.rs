//! Generated artifacts and the artifact roster
//!
//! An artifact is one generated per-employee document, identified by its
//! filename. The roster is the service's current listing; its `count`
//! field is recomputed locally rather than trusted.

use serde::{Deserialize, Serialize};

/// One generated output document.
///
/// Identity is `filename`; no two artifacts in a roster share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique filename within the output directory
    pub filename: String,

    /// Size in bytes
    #[serde(default)]
    pub file_size: u64,

    /// Creation time, epoch seconds (fractional, as reported)
    #[serde(default)]
    pub created: f64,

    /// Server-side path of the file
    #[serde(default)]
    pub file_path: String,
}

/// The current list of generated artifacts as reported by the service.
///
/// Ordering of `files` is server-defined and not contractual.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArtifactRoster {
    /// Artifacts, server order
    #[serde(default)]
    pub files: Vec<Artifact>,

    /// Number of artifacts; must equal `files.len()` on anything this
    /// codebase returns
    #[serde(default)]
    pub count: usize,

    /// Server-side output directory
    #[serde(default)]
    pub output_directory: String,

    /// Output format label, if the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ArtifactRoster {
    /// Empty roster: the safe default for absorbed read failures and for
    /// an upstream that does not expose listing yet.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recompute `count` from `files`, discarding whatever the upstream
    /// claimed. The count invariant is enforced on responses we return,
    /// not assumed of responses we receive.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.count = self.files.len();
        self
    }

    /// Look up an artifact by its filename.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&Artifact> {
        self.files.iter().find(|a| a.filename == filename)
    }

    /// Whether the roster holds no artifacts.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn artifact(name: &str) -> Artifact {
        Artifact {
            filename: name.to_string(),
            file_size: 1024,
            created: 1_700_000_000.0,
            file_path: format!("/output/{name}"),
        }
    }

    #[test]
    fn empty_roster_is_consistent() {
        let roster = ArtifactRoster::empty();
        assert!(roster.is_empty());
        assert_eq!(roster.count, 0);
        assert_eq!(roster, roster.clone().normalized());
    }

    #[test]
    fn normalized_overrides_upstream_count() {
        let roster = ArtifactRoster {
            files: vec![artifact("a.pdf"), artifact("b.pdf")],
            count: 99,
            output_directory: "/output".to_string(),
            format: None,
        };
        let normalized = roster.normalized();
        assert_eq!(normalized.count, 2);
    }

    #[test]
    fn lookup_by_filename() {
        let roster = ArtifactRoster {
            files: vec![artifact("a.pdf")],
            count: 1,
            ..ArtifactRoster::default()
        };
        assert!(roster.get("a.pdf").is_some());
        assert!(roster.get("missing.pdf").is_none());
    }

    #[test]
    fn deserializes_service_listing() {
        let json = r#"{
            "files": [
                {"filename": "Alice.pdf", "file_path": "/out/Alice.pdf", "file_size": 2048, "created": 1700000123.5}
            ],
            "count": 1,
            "output_directory": "/out",
            "format": "standard"
        }"#;
        let roster: ArtifactRoster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.files.len(), 1);
        assert_eq!(roster.files[0].filename, "Alice.pdf");
        assert_eq!(roster.format.as_deref(), Some("standard"));
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let roster: ArtifactRoster = serde_json::from_str(r#"{"files": []}"#).unwrap();
        assert_eq!(roster, ArtifactRoster::empty());
    }
}
