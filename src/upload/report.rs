//! JSON run report written after the last row.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::outcome::{OutcomeKind, RowReport, RunTally};

#[derive(Debug, Serialize)]
pub struct RowEntry {
    pub line: Option<u64>,
    pub path: Option<PathBuf>,
    pub system_id: Option<String>,
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&RowReport> for RowEntry {
    fn from(row: &RowReport) -> Self {
        Self {
            line: row.line,
            path: row.source_path.clone(),
            system_id: row.external_id.clone(),
            outcome: row.outcome.kind(),
            asset_id: row.outcome.asset_id().map(str::to_string),
            collection_id: row.outcome.collection_id().map(str::to_string),
            detail: row.outcome.detail(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
    pub tally: RunTally,
    pub rows: Vec<RowEntry>,
}

impl RunReport {
    pub fn new(
        started_at: DateTime<Utc>,
        cancelled: bool,
        tally: RunTally,
        rows: &[RowReport],
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            cancelled,
            tally,
            rows: rows.iter().map(RowEntry::from).collect(),
        }
    }

    pub async fn write(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote run report");
        Ok(())
    }
}
