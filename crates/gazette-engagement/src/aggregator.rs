use std::collections::BTreeSet;
use std::sync::Arc;

use gazette_core::{DayOffset, ReportBucket, ReportKind, Timestamp};
use gazette_db::Database;
use tracing::{debug, trace};

use crate::LOG_TARGET;
use crate::error::EngagementResult;
use crate::sampling::SamplingGate;

/// Rolls admitted view events into daily per-label counters
#[derive(Debug)]
pub struct ReportAggregator {
    db: Arc<Database>,
    gate: SamplingGate,
    day_offset: DayOffset,
}

impl ReportAggregator {
    pub fn new(db: Arc<Database>, gate: SamplingGate, day_offset: DayOffset) -> Self {
        Self {
            db,
            gate,
            day_offset,
        }
    }

    pub fn day_offset(&self) -> DayOffset {
        self.day_offset
    }

    pub fn gate(&self) -> &SamplingGate {
        &self.gate
    }

    pub async fn record_labels(
        &self,
        labels: &BTreeSet<String>,
    ) -> EngagementResult<Option<ReportBucket>> {
        self.record_labels_at(labels, Timestamp::now()).await
    }

    /// Count one view of every label in `labels` towards the bucket of the
    /// day `now` falls on
    ///
    /// Returns the updated bucket, or `None` if the event was not admitted
    /// or there was nothing to count.
    pub async fn record_labels_at(
        &self,
        labels: &BTreeSet<String>,
        now: Timestamp,
    ) -> EngagementResult<Option<ReportBucket>> {
        if !self.gate.admit() {
            trace!(target: LOG_TARGET, "View event not admitted");
            return Ok(None);
        }
        if labels.is_empty() {
            return Ok(None);
        }

        let report_date = self.day_offset.start_of_day(now);
        let bucket = self
            .db
            .increment_labels(
                report_date,
                ReportKind::View,
                labels.iter().map(String::as_str),
                now,
            )
            .await?;

        debug!(
            target: LOG_TARGET,
            %report_date,
            labels = labels.len(),
            "Recorded view labels"
        );
        Ok(Some(bucket))
    }

    /// Bucket of `kind` for the local day `ts` falls on
    pub async fn report(
        &self,
        ts: Timestamp,
        kind: ReportKind,
    ) -> EngagementResult<Option<ReportBucket>> {
        Ok(self
            .db
            .get_report(self.day_offset.start_of_day(ts), kind)
            .await?)
    }

    /// Buckets of `kind` for all local days from the one `from` falls on to
    /// the one `to` falls on, both inclusive
    pub async fn reports_between(
        &self,
        from: Timestamp,
        to: Timestamp,
        kind: ReportKind,
    ) -> EngagementResult<Vec<ReportBucket>> {
        Ok(self
            .db
            .get_reports_between(
                self.day_offset.start_of_day(from),
                self.day_offset.start_of_day(to),
                kind,
            )
            .await?)
    }
}

#[cfg(test)]
mod tests;
