mod cli;

use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;

use clap::Parser;
use cli::{ArticleCmd, DevCmd, MemberCmd, Opts, OptsCmd, ReportCmd};
use gazette_core::{Article, ArticleId, MemberId, PageRequest, ReportKind, Timestamp};
use gazette_db::{Database, DbError};
use gazette_engagement::{EngagementError, Engine, ListingOrder, Transition};
use gazette_util_error::FmtCompact as _;
use serde_json::json;
use snafu::{OptionExt as _, ResultExt, Snafu, Whatever};
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub const LOG_TARGET: &str = "gazette::cli";

type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Miscellaneous error: {source}"))]
    Whatever { source: Whatever },
    #[snafu(display("Data dir error: {source:?}"))]
    DataDir { source: io::Error },
    #[snafu(display("Could not determine a data dir, use --data-dir"))]
    NoDataDir,
    #[snafu(display("Database error: {source}"))]
    Database { source: DbError },
    #[snafu(display("{source} ({kind})", kind = source.kind()))]
    Engagement { source: EngagementError },
    #[snafu(display("Output error: {source}"))]
    Json { source: serde_json::Error },
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[snafu::report]
#[tokio::main]
async fn main() -> CliResult<()> {
    init_logging().context(WhateverSnafu)?;

    let opts = Opts::parse();
    match handle_cmd(opts).await {
        Ok(v) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&v).context(JsonSnafu)?
            );
            Ok(())
        }
        Err(err) => {
            warn!(target: LOG_TARGET, err = %err.fmt_compact(), "Command failed");
            Err(err)
        }
    }
}

async fn open_engine(global: &cli::GlobalOpts) -> CliResult<Engine> {
    let data_dir = global.data_dir().context(NoDataDirSnafu)?;
    let db_path = Database::mk_db_path(data_dir)
        .await
        .context(DataDirSnafu)?;
    debug!(target: LOG_TARGET, path = %db_path.display(), "Using database");

    let db = Database::open(db_path).await.context(DatabaseSnafu)?;

    Ok(Engine::builder()
        .db(Arc::new(db))
        .sampling(global.sampling)
        .day_offset(global.utc_offset)
        .random_page_bound(global.random_page_bound)
        .view_labels(global.view_labels)
        .build())
}

fn transition_to_value(transition: Transition) -> CliResult<serde_json::Value> {
    Ok(json!({
        "outcome": serde_json::to_value(transition).context(JsonSnafu)?,
        "message": transition.message(),
    }))
}

async fn handle_cmd(opts: Opts) -> CliResult<serde_json::Value> {
    let engine = open_engine(&opts.global).await?;

    Ok(match opts.cmd {
        OptsCmd::Member(MemberCmd::Add { member }) => {
            let member_id = member.unwrap_or_else(MemberId::random);
            engine.add_member(member_id).await.context(EngagementSnafu)?;

            json!({ "member_id": member_id })
        }
        OptsCmd::Article(ArticleCmd::Publish {
            author,
            title,
            topics,
            labels,
            published,
            id,
        }) => {
            let article = Article {
                id: id.unwrap_or_else(ArticleId::random),
                title,
                topics: topics.into_iter().collect::<BTreeSet<_>>(),
                labels: labels.into_iter().collect::<BTreeSet<_>>(),
                published: published.map(Timestamp).unwrap_or_else(Timestamp::now),
            };
            let transition = engine
                .engagement()
                .publish(author, &article)
                .await
                .context(EngagementSnafu)?;

            let mut value = transition_to_value(transition)?;
            value["article_id"] = json!(article.id);
            value
        }
        OptsCmd::Article(ArticleCmd::Show { article }) => {
            let article = engine
                .listing()
                .article(article)
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(article).context(JsonSnafu)?
        }
        OptsCmd::Save { member, article } => transition_to_value(
            engine
                .engagement()
                .save(member, article)
                .await
                .context(EngagementSnafu)?,
        )?,
        OptsCmd::Unsave { member, article } => transition_to_value(
            engine
                .engagement()
                .unsave(member, article)
                .await
                .context(EngagementSnafu)?,
        )?,
        OptsCmd::View { member, article } => transition_to_value(
            engine
                .engagement()
                .view(member, article)
                .await
                .context(EngagementSnafu)?,
        )?,
        OptsCmd::Engagement { member } => {
            let lists = engine
                .engagement()
                .engagement(member)
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(lists).context(JsonSnafu)?
        }
        OptsCmd::List { member, list, page } => {
            let page = engine
                .listing()
                .list(member, list, PageRequest::new(page.page, page.size))
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(page).context(JsonSnafu)?
        }
        OptsCmd::Resolve {
            ids,
            page,
            requested_order,
        } => {
            let order = if requested_order {
                ListingOrder::Requested
            } else {
                ListingOrder::Published
            };
            let page = engine
                .listing()
                .resolve(&ids, PageRequest::new(page.page, page.size), order)
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(page).context(JsonSnafu)?
        }
        OptsCmd::Random { size } => {
            let random = engine
                .listing()
                .random(size)
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(random).context(JsonSnafu)?
        }
        OptsCmd::Report(ReportCmd::Show { at }) => {
            let at = at.map(Timestamp).unwrap_or_else(Timestamp::now);
            let bucket = engine
                .aggregator()
                .report(at, ReportKind::View)
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(bucket).context(JsonSnafu)?
        }
        OptsCmd::Report(ReportCmd::Range { from, to }) => {
            let buckets = engine
                .aggregator()
                .reports_between(Timestamp(from), Timestamp(to), ReportKind::View)
                .await
                .context(EngagementSnafu)?;
            serde_json::to_value(buckets).context(JsonSnafu)?
        }
        OptsCmd::Dev(DevCmd::DbDump { table }) => {
            let records = engine
                .db()
                .dump_table(&table)
                .await
                .context(DatabaseSnafu)?;
            serde_json::to_value(records).context(JsonSnafu)?
        }
    })
}

pub fn init_logging() -> WhateverResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| {
            <Whatever as snafu::FromString>::without_source(
                "Failed to initialize logging".to_string(),
            )
        })?;

    Ok(())
}
