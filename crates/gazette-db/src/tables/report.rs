use std::collections::BTreeMap;

use bincode::{Decode, Encode};
use gazette_core::{ReportBucket, ReportId, ReportKind, Timestamp};
use serde::Serialize;

/// Record for the `reports` table.
///
/// The day and kind are the key, so they are not repeated here.
#[derive(Debug, Encode, Decode, Clone, Serialize)]
pub struct ReportBucketRecord {
    pub id: ReportId,
    pub created: Timestamp,
    /// Last time any count was incremented
    pub updated: Timestamp,
    pub label_counts: BTreeMap<String, u64>,
}

impl ReportBucketRecord {
    pub fn new(id: ReportId, now: Timestamp) -> Self {
        Self {
            id,
            created: now,
            updated: now,
            label_counts: BTreeMap::new(),
        }
    }

    pub fn into_bucket(self, report_date: Timestamp, kind: ReportKind) -> ReportBucket {
        ReportBucket {
            id: self.id,
            report_date,
            kind,
            created: self.created,
            updated: self.updated,
            label_counts: self.label_counts,
        }
    }
}
