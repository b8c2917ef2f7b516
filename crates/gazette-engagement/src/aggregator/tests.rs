use std::collections::BTreeSet;
use std::sync::Arc;

use gazette_core::{DayOffset, ReportKind, Timestamp};
use gazette_db::Database;
use gazette_util_error::BoxedErrorResult;
use snafu::ResultExt as _;
use tempfile::{TempDir, tempdir};

use super::ReportAggregator;
use crate::{SamplingGate, SamplingMode};

/// 2024-03-10T00:00:00+07:00
const MIDNIGHT_PLUS_7: u64 = 1_710_003_600;

async fn temp_aggregator(mode: SamplingMode) -> BoxedErrorResult<(TempDir, ReportAggregator)> {
    let dir = tempdir()?;
    let db = Database::open(dir.path().join("db.redb")).await.boxed()?;

    Ok((
        dir,
        ReportAggregator::new(
            Arc::new(db),
            SamplingGate::new(mode),
            DayOffset::UTC_PLUS_7,
        ),
    ))
}

fn labels(labels: &[&str]) -> BTreeSet<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn same_labels_twice_count_twice() -> BoxedErrorResult<()> {
    let (_dir, aggregator) = temp_aggregator(SamplingMode::All).await?;
    let now = Timestamp(MIDNIGHT_PLUS_7 + 3600);

    aggregator
        .record_labels_at(&labels(&["sports", "tech"]), now)
        .await?;
    let bucket = aggregator
        .record_labels_at(&labels(&["sports", "tech"]), now)
        .await?
        .expect("admitted");

    assert_eq!(bucket.count("sports"), 2);
    assert_eq!(bucket.count("tech"), 2);
    assert_eq!(bucket.report_date, Timestamp(MIDNIGHT_PLUS_7));
    assert_eq!(bucket.kind, ReportKind::View);

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn alternate_gate_counts_every_other_event() -> BoxedErrorResult<()> {
    let (_dir, aggregator) = temp_aggregator(SamplingMode::Alternate).await?;
    let now = Timestamp(MIDNIGHT_PLUS_7);

    let mut admitted = vec![];
    for _ in 0..4 {
        admitted.push(
            aggregator
                .record_labels_at(&labels(&["sports"]), now)
                .await?
                .is_some(),
        );
    }
    assert_eq!(admitted, vec![true, false, true, false]);

    let bucket = aggregator
        .report(now, ReportKind::View)
        .await?
        .expect("bucket exists");
    assert_eq!(bucket.count("sports"), 2);

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn empty_labels_do_not_create_bucket() -> BoxedErrorResult<()> {
    let (_dir, aggregator) = temp_aggregator(SamplingMode::All).await?;
    let now = Timestamp(MIDNIGHT_PLUS_7);

    assert_eq!(aggregator.record_labels_at(&labels(&[]), now).await?, None);
    assert_eq!(aggregator.report(now, ReportKind::View).await?, None);

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn day_boundary_splits_buckets() -> BoxedErrorResult<()> {
    let (_dir, aggregator) = temp_aggregator(SamplingMode::All).await?;
    let before_midnight = Timestamp(MIDNIGHT_PLUS_7 - 1);
    let after_midnight = Timestamp(MIDNIGHT_PLUS_7 + 1);

    let first = aggregator
        .record_labels_at(&labels(&["sports"]), before_midnight)
        .await?
        .expect("admitted");
    let second = aggregator
        .record_labels_at(&labels(&["sports"]), after_midnight)
        .await?
        .expect("admitted");

    assert_ne!(first.id, second.id);
    assert_eq!(first.report_date, Timestamp(MIDNIGHT_PLUS_7 - 86_400));
    assert_eq!(second.report_date, Timestamp(MIDNIGHT_PLUS_7));

    let earlier = aggregator
        .report(before_midnight, ReportKind::View)
        .await?
        .expect("bucket exists");
    assert_eq!(earlier, first);
    assert_eq!(earlier.count("sports"), 1);

    let both = aggregator
        .reports_between(before_midnight, after_midnight, ReportKind::View)
        .await?;
    assert_eq!(both, vec![first, second]);

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn concurrent_recording_loses_nothing() -> BoxedErrorResult<()> {
    let (_dir, aggregator) = temp_aggregator(SamplingMode::All).await?;
    let aggregator = Arc::new(aggregator);
    let now = Timestamp(MIDNIGHT_PLUS_7 + 60);

    let mut handles = vec![];
    for _ in 0..32 {
        let aggregator = aggregator.clone();
        handles.push(tokio::spawn(async move {
            aggregator
                .record_labels_at(&labels(&["sports", "tech"]), now)
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let buckets = aggregator
        .reports_between(now, now, ReportKind::View)
        .await?;
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].count("sports"), 32);
    assert_eq!(buckets[0].count("tech"), 32);

    Ok(())
}
