use serde::Serialize;

use crate::entities::project::ProjectSummary;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeedFailure {
    pub slug: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub inserted_count: usize,
    pub failed_count: usize,
    pub failures: Vec<SeedFailure>,
}

/// How the outcome of a reseed maps onto an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AllInserted,
    Partial,
    AllFailed,
}

impl SeedReport {
    pub fn outcome(&self) -> SeedOutcome {
        match (self.inserted_count, self.failed_count) {
            (_, 0) => SeedOutcome::AllInserted,
            (0, _) => SeedOutcome::AllFailed,
            _ => SeedOutcome::Partial,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeedStatus {
    pub count: u64,
    pub sample: Vec<ProjectSummary>,
}
