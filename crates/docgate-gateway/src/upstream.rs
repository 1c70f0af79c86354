//! Upstream path constants for the processing service
//!
//! All routes share one configured base URL; these are the path suffixes
//! the gateway appends to it. Filename-bearing paths are produced with
//! plain concatenation so percent-escapes survive untouched.

/// Upload-and-generate endpoint (multipart POST).
pub const UPLOAD: &str = "/api/spreadsheet/upload";

/// Spreadsheet status endpoint.
pub const STATUS: &str = "/api/spreadsheet/status";

/// Clear-spreadsheet endpoint.
pub const CLEAR: &str = "/api/spreadsheet/clear";

/// Artifact listing endpoint.
pub const LIST: &str = "/api/documents/list";

/// Artifact download endpoint prefix; the filename segment is appended.
pub const DOWNLOAD: &str = "/api/documents/download";

/// Artifact delete endpoint prefix; the filename segment is appended.
pub const DELETE: &str = "/api/documents/delete";

/// Delete-all-artifacts endpoint.
pub const DELETE_ALL: &str = "/api/documents/delete-all";

/// Path for downloading one artifact, filename forwarded verbatim.
#[inline]
#[must_use]
pub fn download_path(filename: &str) -> String {
    format!("{DOWNLOAD}/{filename}")
}

/// Path for deleting one artifact, filename forwarded verbatim.
#[inline]
#[must_use]
pub fn delete_path(filename: &str) -> String {
    format!("{DELETE}/{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_paths_keep_percent_escapes() {
        assert_eq!(
            download_path("Report%20Final.pdf"),
            "/api/documents/download/Report%20Final.pdf"
        );
        assert_eq!(
            delete_path("Alice%2BBob.pdf"),
            "/api/documents/delete/Alice%2BBob.pdf"
        );
    }
}
