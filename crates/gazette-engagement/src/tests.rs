use std::collections::BTreeSet;
use std::sync::Arc;

use gazette_core::{Article, ArticleId, DayOffset, MemberId, ReportKind, Timestamp};
use gazette_db::Database;
use gazette_util_error::BoxedErrorResult;
use snafu::ResultExt as _;
use tempfile::{TempDir, tempdir};

use crate::{Engine, ErrorKind, RandomPageBound, SamplingMode, ViewLabels};

pub(crate) async fn temp_engine(
    sampling: SamplingMode,
    random_page_bound: RandomPageBound,
) -> BoxedErrorResult<(TempDir, Engine)> {
    let dir = tempdir()?;
    let db = Database::open(dir.path().join("db.redb")).await.boxed()?;

    let engine = Engine::builder()
        .db(Arc::new(db))
        .sampling(sampling)
        .day_offset(DayOffset::UTC_PLUS_7)
        .random_page_bound(random_page_bound)
        .view_labels(ViewLabels::Labels)
        .build();

    Ok((dir, engine))
}

pub(crate) fn build_test_article(published: u64, topics: &[&str], labels: &[&str]) -> Article {
    Article {
        id: ArticleId::random(),
        title: format!("Article {published}"),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        published: Timestamp(published),
    }
}

/// Views counted under `label` on every day from the one `since` falls on
/// up to today
pub(crate) async fn view_count_since(
    engine: &Engine,
    label: &str,
    since: Timestamp,
) -> BoxedErrorResult<u64> {
    Ok(engine
        .aggregator()
        .reports_between(since, Timestamp::now(), ReportKind::View)
        .await?
        .iter()
        .map(|bucket| bucket.count(label))
        .sum())
}

/// A fresh member with `count` published articles, oldest first
pub(crate) async fn author_with_articles(
    engine: &Engine,
    count: u64,
) -> BoxedErrorResult<(MemberId, Vec<Article>)> {
    let author = MemberId::random();
    engine.add_member(author).await?;

    let mut articles = vec![];
    for i in 0..count {
        let article = build_test_article(1_000 + i, &["news"], &[]);
        engine.engagement().publish(author, &article).await?;
        articles.push(article);
    }

    Ok((author, articles))
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn engine_defaults() -> BoxedErrorResult<()> {
    let dir = tempdir()?;
    let db = Database::open(dir.path().join("db.redb")).await?;
    let engine = Engine::builder().db(Arc::new(db)).build();

    assert_eq!(engine.aggregator().gate().mode(), SamplingMode::Alternate);
    assert_eq!(engine.aggregator().day_offset(), DayOffset::UTC_PLUS_7);
    assert_eq!(
        engine.listing().random_page_bound(),
        RandomPageBound::ExcludeLast
    );
    assert_eq!(engine.engagement().view_labels(), ViewLabels::ArticleId);

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn add_member_twice_conflicts() -> BoxedErrorResult<()> {
    let (_dir, engine) = temp_engine(SamplingMode::All, RandomPageBound::Full).await?;
    let member_id = MemberId::random();

    engine.add_member(member_id).await?;
    let err = engine
        .add_member(member_id)
        .await
        .expect_err("second add fails");
    assert_eq!(err.kind(), ErrorKind::Conflict);

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn view_flow_end_to_end() -> BoxedErrorResult<()> {
    let (_dir, engine) = temp_engine(SamplingMode::All, RandomPageBound::Full).await?;
    let (_author, articles) = author_with_articles(&engine, 1).await?;
    let reader = MemberId::random();
    engine.add_member(reader).await?;
    let since = Timestamp::now();

    engine.engagement().view(reader, articles[0].id).await?;
    engine.engagement().view(None::<MemberId>, articles[0].id).await?;

    let lists = engine.engagement().engagement(reader).await?;
    assert_eq!(lists.viewed, vec![articles[0].id]);

    assert_eq!(view_count_since(&engine, "news", since).await?, 2);
    let labels = engine
        .aggregator()
        .reports_between(since, Timestamp::now(), ReportKind::View)
        .await?
        .into_iter()
        .flat_map(|bucket| bucket.label_counts.into_keys())
        .collect::<BTreeSet<_>>();
    assert_eq!(labels, BTreeSet::from(["news".to_string()]));

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn views_count_under_article_id_by_default() -> BoxedErrorResult<()> {
    let dir = tempdir()?;
    let db = Database::open(dir.path().join("db.redb")).await?;
    let engine = Engine::builder()
        .db(Arc::new(db))
        .sampling(SamplingMode::All)
        .build();
    let (_author, articles) = author_with_articles(&engine, 1).await?;
    let article = &articles[0];

    let before = Timestamp::now();
    engine.engagement().view(None::<MemberId>, article.id).await?;
    let after = Timestamp::now();

    let buckets = engine
        .aggregator()
        .reports_between(before, after, ReportKind::View)
        .await?;
    assert_eq!(buckets.len(), 1);
    let bucket = &buckets[0];
    assert_eq!(bucket.count(&article.id.to_string()), 1);
    assert_eq!(bucket.count("news"), 0);
    assert_eq!(bucket.label_counts.len(), 1);

    Ok(())
}

#[test]
fn view_labels_parse_and_display() {
    for labels in [ViewLabels::ArticleId, ViewLabels::Labels] {
        assert_eq!(labels.to_string().parse::<ViewLabels>().ok(), Some(labels));
    }
    assert_eq!("article-id".parse::<ViewLabels>().ok(), Some(ViewLabels::ArticleId));
    assert!("topics".parse::<ViewLabels>().is_err());

    let article = build_test_article(1, &["news"], &["breaking"]);
    assert_eq!(
        ViewLabels::ArticleId.labels_for(&article),
        BTreeSet::from([article.id.to_string()])
    );
    assert_eq!(
        ViewLabels::Labels.labels_for(&article),
        BTreeSet::from(["breaking".to_string(), "news".to_string()])
    );
}
