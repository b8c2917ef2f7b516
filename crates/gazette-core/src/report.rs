use std::collections::BTreeMap;

use crate::{ReportId, ReportKind, Timestamp};

/// Daily aggregate of view counts per label
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBucket {
    pub id: ReportId,
    /// Local midnight starting the day this bucket covers
    pub report_date: Timestamp,
    pub kind: ReportKind,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub label_counts: BTreeMap<String, u64>,
}

impl ReportBucket {
    pub fn count(&self, label: &str) -> u64 {
        self.label_counts.get(label).copied().unwrap_or_default()
    }
}
