//! Generation results and mutation acknowledgements
//!
//! A [`GenerationResult`] is produced once per upload and held transiently
//! by the caller; it is never cached. Authoritative post-upload state comes
//! from the status and roster reads that follow invalidation.

use serde::{Deserialize, Serialize};

/// One file produced during a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Output filename
    pub filename: String,

    /// Server-side path
    #[serde(default)]
    pub file_path: String,

    /// Employee name the document belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Employee id the document belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emp_id: Option<String>,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// Outcome of one upload-and-generate run, including the filters that
/// were applied server-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Whether at least one document was generated
    #[serde(default)]
    pub success: bool,

    /// Human-readable summary
    #[serde(default)]
    pub message: String,

    /// Files produced by this run
    #[serde(default)]
    pub generated_files: Vec<GeneratedFile>,

    /// Distinct employees found in the spreadsheet
    #[serde(default)]
    pub total_employees: u64,

    /// Documents generated without error
    #[serde(default)]
    pub successful_generations: u64,

    /// Documents that failed to generate
    #[serde(default)]
    pub failed_generations: u64,

    /// Total output resources produced
    #[serde(default)]
    pub total_resources: u64,

    /// Name-letter filter that was applied, empty if none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_letter: Option<String>,

    /// Employee-id prefix filter that was applied, empty if none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_emp_id: Option<String>,

    /// Billability filter that was applied, empty if none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_billability: Option<String>,

    /// Free-form condition that was applied, empty if none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_condition_applied: Option<String>,
}

/// Acknowledgement returned by delete and clear operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationAck {
    /// Whether the mutation took effect server-side
    #[serde(default)]
    pub success: bool,

    /// Human-readable outcome
    #[serde(default)]
    pub message: String,
}
