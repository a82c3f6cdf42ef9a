//! Execution statistics recorded on a query after it has run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How far the row counts can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoStatus {
    /// Planner estimate only.
    Estimate,
    /// At least `rows` rows exist; counting stopped early.
    AtLeast,
    /// Rows were counted.
    Exact,
}

/// Row-count statistics the execution engine attaches to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsInfo {
    /// Best guess at the number of result rows.
    pub rows: u64,
    /// Lower bound on the number of rows.
    pub min: u64,
    /// Upper bound on the number of rows.
    pub max: u64,
    pub status: InfoStatus,
    /// Engine-specific cost figure.
    pub complexity: u64,
    pub computed_at: DateTime<Utc>,
}

impl ResultsInfo {
    pub fn estimate(rows: u64, complexity: u64) -> Self {
        Self {
            rows,
            min: 0,
            max: u64::MAX,
            status: InfoStatus::Estimate,
            complexity,
            computed_at: Utc::now(),
        }
    }

    pub fn exact(rows: u64) -> Self {
        Self {
            rows,
            min: rows,
            max: rows,
            status: InfoStatus::Exact,
            complexity: 0,
            computed_at: Utc::now(),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.status == InfoStatus::Exact
    }
}
