use gazette_core::{ReportBucket, ReportId, ReportKind, Timestamp};
use redb_bincode::ReadableTable as _;
use snafu::OptionExt as _;
use tracing::trace;

use crate::{Database, DbResult, LOG_TARGET, OverflowSnafu, ReportBucketRecord, reports};

impl Database {
    /// Add one to the count of every label in the bucket for
    /// `(report_date, kind)`, creating the bucket first if needed
    ///
    /// Runs inside the caller's write transaction, so concurrent increments
    /// never lose updates and never create a second bucket for the same key.
    pub fn increment_labels_tx<'l>(
        report_date: Timestamp,
        kind: ReportKind,
        labels: impl IntoIterator<Item = &'l str>,
        now: Timestamp,
        reports_table: &mut reports::Table,
    ) -> DbResult<ReportBucketRecord> {
        let key = (report_date, kind);
        let mut record = match reports_table.get(&key)?.map(|g| g.value()) {
            Some(existing) => existing,
            None => {
                trace!(target: LOG_TARGET, %report_date, %kind, "Creating report bucket");
                ReportBucketRecord::new(ReportId::random(), now)
            }
        };

        for label in labels {
            let count = record.label_counts.entry(label.to_owned()).or_default();
            *count = count.checked_add(1).context(OverflowSnafu)?;
        }
        record.updated = now;

        reports_table.insert(&key, &record)?;

        Ok(record)
    }

    pub fn get_report_tx(
        report_date: Timestamp,
        kind: ReportKind,
        reports_table: &impl reports::ReadableTable,
    ) -> DbResult<Option<ReportBucket>> {
        Ok(reports_table
            .get(&(report_date, kind))?
            .map(|g| g.value().into_bucket(report_date, kind)))
    }

    pub async fn increment_labels<'l>(
        &self,
        report_date: Timestamp,
        kind: ReportKind,
        labels: impl IntoIterator<Item = &'l str>,
        now: Timestamp,
    ) -> DbResult<ReportBucket> {
        self.write_with(|tx| {
            let record = Self::increment_labels_tx(
                report_date,
                kind,
                labels,
                now,
                &mut tx.open_table(&reports::TABLE)?,
            )?;
            Ok(record.into_bucket(report_date, kind))
        })
        .await
    }

    pub async fn get_report(
        &self,
        report_date: Timestamp,
        kind: ReportKind,
    ) -> DbResult<Option<ReportBucket>> {
        self.read_with(|tx| Self::get_report_tx(report_date, kind, &tx.open_table(&reports::TABLE)?))
            .await
    }

    /// Buckets of `kind` with a report date in `from..=to`, oldest first
    pub async fn get_reports_between(
        &self,
        from: Timestamp,
        to: Timestamp,
        kind: ReportKind,
    ) -> DbResult<Vec<ReportBucket>> {
        if to < from {
            return Ok(vec![]);
        }
        self.read_with(|tx| {
            let reports_table = tx.open_table(&reports::TABLE)?;
            let mut ret = vec![];
            for record in reports_table.range((from, kind)..=(to, kind))? {
                let (k, v) = record?;
                let (report_date, record_kind) = k.value();
                if record_kind != kind {
                    continue;
                }
                ret.push(v.value().into_bucket(report_date, record_kind));
            }
            Ok(ret)
        })
        .await
    }
}
