//! Spreadsheet state as reported by the processing service
//!
//! Read-only to this codebase; the service owns parsing and schema
//! detection. The only local obligation is the column-count invariant
//! check and a safe default for absorbed read failures.

use serde::{Deserialize, Serialize};

/// Existence and schema state of the uploaded spreadsheet.
///
/// Produced by the processing service's status endpoint. All schema
/// fields are absent when no spreadsheet has been uploaded yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpreadsheetState {
    /// Whether a spreadsheet is currently held by the service
    #[serde(default)]
    pub exists: bool,

    /// Number of data rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,

    /// Column names in sheet order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Number of columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns_count: Option<usize>,

    /// Whether an employee-name column was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_user_name: Option<bool>,

    /// Whether an employee-id column was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_emp_id: Option<bool>,

    /// Human-readable status message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SpreadsheetState {
    /// Safe default used when a background status read fails: no
    /// spreadsheet, no schema claims.
    #[inline]
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// Check the `columns_count == columns.len()` invariant.
    ///
    /// Holds vacuously when either field is absent.
    #[must_use]
    pub fn column_count_consistent(&self) -> bool {
        match (&self.columns, self.columns_count) {
            (Some(cols), Some(count)) => cols.len() == count,
            _ => true,
        }
    }

    /// Whether generation can be triggered against the held spreadsheet.
    #[inline]
    #[must_use]
    pub fn ready_for_generation(&self) -> bool {
        self.exists
    }
}
