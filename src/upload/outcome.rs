use std::path::PathBuf;

use serde::Serialize;

use super::collections::CollectionAssignment;
use super::error::UploadError;
use crate::flickr::FlickrError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    SkippedMissingFile,
    UploadFailed,
    InvalidResponse,
    CollectionAssignmentFailed,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutcomeKind::Success => "success",
            OutcomeKind::SkippedMissingFile => "skipped (missing file)",
            OutcomeKind::UploadFailed => "upload failed",
            OutcomeKind::InvalidResponse => "invalid response",
            OutcomeKind::CollectionAssignmentFailed => "collection assignment failed",
        };
        f.write_str(s)
    }
}

/// Result of processing one manifest row. Produced exactly once per row.
#[derive(Debug)]
pub enum UploadOutcome {
    Success {
        asset_id: String,
        collection: Option<CollectionAssignment>,
    },
    SkippedMissingFile,
    UploadFailed(UploadError),
    InvalidResponse(String),
    /// The photo exists remotely but is not in its album.
    CollectionAssignmentFailed { asset_id: String, cause: FlickrError },
}

impl UploadOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            UploadOutcome::Success { .. } => OutcomeKind::Success,
            UploadOutcome::SkippedMissingFile => OutcomeKind::SkippedMissingFile,
            UploadOutcome::UploadFailed(_) => OutcomeKind::UploadFailed,
            UploadOutcome::InvalidResponse(_) => OutcomeKind::InvalidResponse,
            UploadOutcome::CollectionAssignmentFailed { .. } => {
                OutcomeKind::CollectionAssignmentFailed
            }
        }
    }

    /// Remote photo id, when the upload itself went through.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success { asset_id, .. }
            | UploadOutcome::CollectionAssignmentFailed { asset_id, .. } => Some(asset_id),
            _ => None,
        }
    }

    pub fn collection_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success {
                collection: Some(c),
                ..
            } => Some(&c.id),
            _ => None,
        }
    }

    /// Human-readable failure cause.
    pub fn detail(&self) -> Option<String> {
        match self {
            UploadOutcome::Success { .. } | UploadOutcome::SkippedMissingFile => None,
            UploadOutcome::UploadFailed(e) => Some(e.to_string()),
            UploadOutcome::InvalidResponse(reason) => Some(reason.clone()),
            UploadOutcome::CollectionAssignmentFailed { cause, .. } => Some(cause.to_string()),
        }
    }
}

impl From<UploadError> for UploadOutcome {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingFile(_) => UploadOutcome::SkippedMissingFile,
            UploadError::InvalidResponse(reason) => UploadOutcome::InvalidResponse(reason),
            other => UploadOutcome::UploadFailed(other),
        }
    }
}

/// One row's outcome plus what is needed to trace it back to the manifest.
#[derive(Debug)]
pub struct RowReport {
    pub line: Option<u64>,
    pub source_path: Option<PathBuf>,
    pub external_id: Option<String>,
    pub outcome: UploadOutcome,
}

/// Outcome counts for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub succeeded: usize,
    pub skipped_missing_file: usize,
    pub upload_failed: usize,
    pub invalid_response: usize,
    pub collection_assignment_failed: usize,
    pub collections_created: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Success { collection, .. } => {
                self.succeeded += 1;
                if collection.as_ref().is_some_and(|c| c.created) {
                    self.collections_created += 1;
                }
            }
            UploadOutcome::SkippedMissingFile => self.skipped_missing_file += 1,
            UploadOutcome::UploadFailed(_) => self.upload_failed += 1,
            UploadOutcome::InvalidResponse(_) => self.invalid_response += 1,
            UploadOutcome::CollectionAssignmentFailed { .. } => {
                self.collection_assignment_failed += 1
            }
        }
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        match kind {
            OutcomeKind::Success => self.succeeded,
            OutcomeKind::SkippedMissingFile => self.skipped_missing_file,
            OutcomeKind::UploadFailed => self.upload_failed,
            OutcomeKind::InvalidResponse => self.invalid_response,
            OutcomeKind::CollectionAssignmentFailed => self.collection_assignment_failed,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failures()
    }

    /// Rows that did not end fully uploaded and filed.
    pub fn failures(&self) -> usize {
        self.skipped_missing_file
            + self.upload_failed
            + self.invalid_response
            + self.collection_assignment_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestError;

    #[test]
    fn test_missing_file_maps_to_skip() {
        let outcome = UploadOutcome::from(UploadError::MissingFile(PathBuf::from("/x.jpg")));
        assert_eq!(outcome.kind(), OutcomeKind::SkippedMissingFile);
        assert!(outcome.detail().is_none());
    }

    #[test]
    fn test_invalid_response_keeps_reason() {
        let outcome = UploadOutcome::from(UploadError::InvalidResponse("no photoid".into()));
        assert_eq!(outcome.kind(), OutcomeKind::InvalidResponse);
        assert_eq!(outcome.detail().as_deref(), Some("no photoid"));
    }

    #[test]
    fn test_malformed_row_is_upload_failure() {
        let err = UploadError::from(ManifestError::MalformedRow {
            line: Some(4),
            message: "expected 7 fields, found 8".into(),
        });
        let outcome = UploadOutcome::from(err);
        assert_eq!(outcome.kind(), OutcomeKind::UploadFailed);
        assert!(outcome.detail().unwrap().contains("line 4"));
    }

    #[test]
    fn test_tally_counts_each_kind() {
        let mut tally = RunTally::default();
        tally.record(&UploadOutcome::Success {
            asset_id: "1".into(),
            collection: Some(CollectionAssignment {
                id: "s".into(),
                created: true,
            }),
        });
        tally.record(&UploadOutcome::Success {
            asset_id: "2".into(),
            collection: Some(CollectionAssignment {
                id: "s".into(),
                created: false,
            }),
        });
        tally.record(&UploadOutcome::SkippedMissingFile);
        tally.record(&UploadOutcome::InvalidResponse("x".into()));
        tally.record(&UploadOutcome::CollectionAssignmentFailed {
            asset_id: "3".into(),
            cause: FlickrError::Api {
                code: "1".into(),
                message: "Photoset not found".into(),
            },
        });

        assert_eq!(tally.count(OutcomeKind::Success), 2);
        assert_eq!(tally.collections_created, 1);
        assert_eq!(tally.count(OutcomeKind::SkippedMissingFile), 1);
        assert_eq!(tally.count(OutcomeKind::InvalidResponse), 1);
        assert_eq!(tally.count(OutcomeKind::CollectionAssignmentFailed), 1);
        assert_eq!(tally.failures(), 3);
        assert_eq!(tally.total(), 5);
    }
}
