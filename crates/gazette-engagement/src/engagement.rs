//! Per-member engagement state: saved, viewed and published articles

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use gazette_core::{Article, ArticleId, MemberId};
use gazette_db::{Database, EngagementLists, PublishOutcome, SaveOutcome, UnsaveOutcome, ViewOutcome};
use gazette_util_error::FmtCompact as _;
use serde::Serialize;
use snafu::{OptionExt as _, Snafu};
use tracing::{debug, warn};

use crate::LOG_TARGET;
use crate::aggregator::ReportAggregator;
use crate::error::{
    AlreadyPublishedSnafu, ArticleNotFoundSnafu, EngagementResult, MemberNotFoundSnafu,
    MissingMemberIdSnafu, NotSavedSnafu,
};

/// What a view of an article is counted under in the daily report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewLabels {
    /// The article id in hex, one counter per article
    #[default]
    ArticleId,
    /// The article's topics and free-form labels
    Labels,
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown view labels: {value}"))]
pub struct ViewLabelsParseError {
    value: String,
}

impl ViewLabels {
    pub fn labels_for(self, article: &Article) -> BTreeSet<String> {
        match self {
            ViewLabels::ArticleId => BTreeSet::from([article.id.to_string()]),
            ViewLabels::Labels => article.report_labels(),
        }
    }
}

impl fmt::Display for ViewLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewLabels::ArticleId => "article-id",
            ViewLabels::Labels => "labels",
        })
    }
}

impl FromStr for ViewLabels {
    type Err = ViewLabelsParseError;

    /// `article-id` or `labels`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "article-id" => Ok(Self::ArticleId),
            "labels" => Ok(Self::Labels),
            _ => ViewLabelsParseSnafu { value: s }.fail(),
        }
    }
}

/// Result of a successful engagement transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Saved,
    AlreadySaved,
    Unsaved,
    Viewed,
    /// The article is saved by the member, so the view is not listed
    ViewSuppressed,
    /// No member given; the view only counted towards reports
    ViewCounted,
    Published,
}

impl Transition {
    pub fn message(self) -> &'static str {
        match self {
            Transition::Saved => "Article saved",
            Transition::AlreadySaved => "Article already saved",
            Transition::Unsaved => "Article removed from saved",
            Transition::Viewed => "Article view recorded",
            Transition::ViewSuppressed => "Article is saved, view not recorded",
            Transition::ViewCounted => "Article view counted",
            Transition::Published => "Article published",
        }
    }
}

/// Applies save/unsave/view/publish transitions to members' lists
///
/// Every transition first checks that the article exists, and runs in a
/// single write transaction.
#[derive(Debug, Clone)]
pub struct EngagementMachine {
    db: Arc<Database>,
    aggregator: Arc<ReportAggregator>,
    view_labels: ViewLabels,
}

impl EngagementMachine {
    pub fn new(
        db: Arc<Database>,
        aggregator: Arc<ReportAggregator>,
        view_labels: ViewLabels,
    ) -> Self {
        Self {
            db,
            aggregator,
            view_labels,
        }
    }

    pub fn view_labels(&self) -> ViewLabels {
        self.view_labels
    }

    async fn require_article(&self, article_id: ArticleId) -> EngagementResult<Article> {
        self.db
            .get_article(article_id)
            .await?
            .context(ArticleNotFoundSnafu { article_id })
    }

    pub async fn save(
        &self,
        member_id: impl Into<Option<MemberId>>,
        article_id: ArticleId,
    ) -> EngagementResult<Transition> {
        self.require_article(article_id).await?;
        let member_id = member_id.into().context(MissingMemberIdSnafu)?;

        let outcome = self
            .db
            .save_article(member_id, article_id)
            .await?
            .context(MemberNotFoundSnafu { member_id })?;

        Ok(match outcome {
            SaveOutcome::Saved => Transition::Saved,
            SaveOutcome::AlreadySaved => Transition::AlreadySaved,
        })
    }

    /// Fails with [`crate::error::EngagementError::NotSaved`] if the article
    /// is not in the member's saved list
    pub async fn unsave(
        &self,
        member_id: impl Into<Option<MemberId>>,
        article_id: ArticleId,
    ) -> EngagementResult<Transition> {
        self.require_article(article_id).await?;
        let member_id = member_id.into().context(MissingMemberIdSnafu)?;

        let outcome = self
            .db
            .unsave_article(member_id, article_id)
            .await?
            .context(MemberNotFoundSnafu { member_id })?;

        match outcome {
            UnsaveOutcome::Unsaved => Ok(Transition::Unsaved),
            UnsaveOutcome::NotSaved => NotSavedSnafu {
                member_id,
                article_id,
            }
            .fail(),
        }
    }

    /// Record a view of an article
    ///
    /// The view counts towards the daily report, under the labels picked by
    /// [`ViewLabels`], whether or not a member is given. Only a given member
    /// gets the article appended to their viewed list, and only if they have
    /// not saved it.
    pub async fn view(
        &self,
        member_id: impl Into<Option<MemberId>>,
        article_id: ArticleId,
    ) -> EngagementResult<Transition> {
        let article = self.require_article(article_id).await?;

        let labels = self.view_labels.labels_for(&article);
        if let Err(err) = self.aggregator.record_labels(&labels).await {
            warn!(
                target: LOG_TARGET,
                err = %err.fmt_compact(),
                %article_id,
                "Failed to record view labels"
            );
            return Err(err);
        }

        let Some(member_id) = member_id.into() else {
            debug!(target: LOG_TARGET, %article_id, "Anonymous view");
            return Ok(Transition::ViewCounted);
        };

        let outcome = self
            .db
            .view_article(member_id, article_id)
            .await?
            .context(MemberNotFoundSnafu { member_id })?;

        Ok(match outcome {
            ViewOutcome::Viewed => Transition::Viewed,
            ViewOutcome::SuppressedSaved => Transition::ViewSuppressed,
        })
    }

    /// Store a new article and append it to the author's published list
    pub async fn publish(
        &self,
        member_id: MemberId,
        article: &Article,
    ) -> EngagementResult<Transition> {
        let outcome = self
            .db
            .publish_article(member_id, article)
            .await?
            .context(MemberNotFoundSnafu { member_id })?;

        match outcome {
            PublishOutcome::Published => Ok(Transition::Published),
            PublishOutcome::ArticleExists => AlreadyPublishedSnafu {
                article_id: article.id,
            }
            .fail(),
        }
    }

    /// All three engagement lists of a member
    pub async fn engagement(&self, member_id: MemberId) -> EngagementResult<EngagementLists> {
        self.db
            .get_engagement_lists(member_id)
            .await?
            .context(MemberNotFoundSnafu { member_id })
    }
}
