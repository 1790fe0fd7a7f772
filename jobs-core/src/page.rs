use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::job::JobRow;

/// One page of search results plus the total for the whole match set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    pub rows: Vec<JobRow>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl SearchResultPage {
    pub fn new(rows: Vec<JobRow>, total: i64, limit: i64, offset: i64) -> Self {
        let has_more = offset + (rows.len() as i64) < total;
        Self {
            rows,
            total,
            limit,
            offset,
            has_more,
        }
    }

    pub fn empty(limit: i64, offset: i64) -> Self {
        Self::new(Vec::new(), 0, limit, offset)
    }

    /// Builds a page from rows that each carry the query-wide total, as
    /// produced by a windowed count. All totals must agree.
    pub fn from_counted_rows(
        rows: Vec<(JobRow, i64)>,
        limit: i64,
        offset: i64,
    ) -> Result<Self, SearchError> {
        let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
        if let Some((row, other)) = rows.iter().find(|(_, t)| *t != total) {
            return Err(SearchError::Query(format!(
                "inconsistent total count: row {} reported {} instead of {}",
                row.id, other, total
            )));
        }

        let rows = rows.into_iter().map(|(row, _)| row).collect();
        Ok(Self::new(rows, total, limit, offset))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Number of matching jobs for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCount {
    pub company_name: String,
    pub job_count: i64,
}
