use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use gazette_core::page::total_pages;
use gazette_core::{Article, ArticleId, EngagementList, MemberId, Page, PageRequest};
use gazette_db::Database;
use itertools::Itertools as _;
use rand::Rng;
use serde::Serialize;
use snafu::{OptionExt as _, Snafu, ensure};
use tracing::trace;

use crate::LOG_TARGET;
use crate::error::{
    ArticleNotFoundSnafu, EngagementResult, InvalidPageSnafu, MemberNotFoundSnafu,
};

/// Order of resolved articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    /// Newest publication first
    #[default]
    Published,
    /// Order of first occurrence in the requested ids
    Requested,
}

/// Range random page indices are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomPageBound {
    /// `[0, total_pages - 1)`, never the last page
    #[default]
    ExcludeLast,
    /// `[0, total_pages)`
    Full,
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown random page bound: {value}"))]
pub struct RandomPageBoundParseError {
    value: String,
}

impl RandomPageBound {
    /// Draw a 0-based page index for a collection of `total_pages` pages
    ///
    /// Collections too small to have a page to draw from yield page 0.
    pub fn sample_index(self, total_pages: u64, rng: &mut impl Rng) -> u64 {
        let end = match self {
            RandomPageBound::ExcludeLast => total_pages.saturating_sub(1),
            RandomPageBound::Full => total_pages,
        };
        if end == 0 {
            return 0;
        }
        rng.random_range(0..end)
    }
}

impl fmt::Display for RandomPageBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RandomPageBound::ExcludeLast => "exclude-last",
            RandomPageBound::Full => "full",
        })
    }
}

impl FromStr for RandomPageBound {
    type Err = RandomPageBoundParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "exclude-last" => Ok(Self::ExcludeLast),
            "full" => Ok(Self::Full),
            _ => RandomPageBoundParseSnafu { value: s }.fail(),
        }
    }
}

/// A page of articles picked at random from the whole collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomArticles {
    /// 0-based
    pub page_index: u64,
    pub size: u32,
    pub total: u64,
    pub total_pages: u64,
    pub items: Vec<Article>,
}

/// Turns lists of article ids into pages of article records
#[derive(Debug, Clone)]
pub struct ArticleListing {
    db: Arc<Database>,
    random_page_bound: RandomPageBound,
}

impl ArticleListing {
    pub fn new(db: Arc<Database>, random_page_bound: RandomPageBound) -> Self {
        Self {
            db,
            random_page_bound,
        }
    }

    pub fn random_page_bound(&self) -> RandomPageBound {
        self.random_page_bound
    }

    pub async fn article(&self, article_id: ArticleId) -> EngagementResult<Article> {
        self.db
            .get_article(article_id)
            .await?
            .context(ArticleNotFoundSnafu { article_id })
    }

    /// Resolve `ids` into a page of articles
    ///
    /// `total` is the number of requested ids, duplicates and ids of
    /// articles that no longer exist included, so `items` over all pages
    /// can add up to less than `total`.
    pub async fn resolve(
        &self,
        ids: &[ArticleId],
        request: PageRequest,
        order: ListingOrder,
    ) -> EngagementResult<Page<Article>> {
        ensure!(
            request.is_valid(),
            InvalidPageSnafu {
                page: request.page,
                size: request.size,
            }
        );

        let total = u64::try_from(ids.len()).unwrap_or(u64::MAX);
        let unique_ids = ids.iter().copied().unique().collect::<Vec<_>>();

        let mut articles = self.db.get_articles(&unique_ids).await?;
        if order == ListingOrder::Published {
            articles.sort_by(|a, b| b.published.cmp(&a.published));
        }

        let items = articles
            .into_iter()
            .skip(request.skip())
            .take(request.limit())
            .collect::<Vec<_>>();

        trace!(
            target: LOG_TARGET,
            requested = ids.len(),
            unique = unique_ids.len(),
            returned = items.len(),
            "Resolved articles"
        );

        Ok(Page {
            items,
            page: request.page,
            size: request.size,
            total,
            total_pages: total_pages(total, request.size),
        })
    }

    /// A page of one of a member's engagement lists, newest publication first
    pub async fn list(
        &self,
        member_id: MemberId,
        list: EngagementList,
        request: PageRequest,
    ) -> EngagementResult<Page<Article>> {
        let ids = self
            .db
            .get_engagement_list(member_id, list)
            .await?
            .context(MemberNotFoundSnafu { member_id })?;

        self.resolve(&ids, request, ListingOrder::Published).await
    }

    /// A page of the whole collection, at a page index drawn according to
    /// the configured [`RandomPageBound`]
    pub async fn random(&self, size: u32) -> EngagementResult<RandomArticles> {
        ensure!(1 <= size, InvalidPageSnafu { page: 0u32, size });

        let total = self.db.count_articles().await?;
        let total_pages = total_pages(total, size);
        let page_index = self
            .random_page_bound
            .sample_index(total_pages, &mut rand::rng());

        let skip = page_index.saturating_mul(u64::from(size));
        let items = self
            .db
            .paginate_articles_by_time(
                usize::try_from(skip).unwrap_or(usize::MAX),
                usize::try_from(size).unwrap_or(usize::MAX),
            )
            .await?;

        Ok(RandomArticles {
            page_index,
            size,
            total,
            total_pages,
            items,
        })
    }
}
