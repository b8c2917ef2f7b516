//! Engagement tracking and view-report aggregation
//!
//! [`Engine`] wires together the pieces:
//!
//! * [`EngagementMachine`] applies save/unsave/view/publish transitions to
//!   members' engagement lists,
//! * [`SamplingGate`] decides which view events are counted,
//! * [`ReportAggregator`] rolls counted views into daily per-label buckets,
//! * [`ArticleListing`] turns id lists into pages of articles.

mod aggregator;
mod engagement;
pub mod error;
mod listing;
mod sampling;

use std::sync::Arc;

use gazette_core::{DayOffset, MemberId};
use gazette_db::Database;
use snafu::ensure;
use tracing::info;

pub use self::aggregator::ReportAggregator;
pub use self::engagement::{
    EngagementMachine, Transition, ViewLabels, ViewLabelsParseError,
};
pub use self::error::{EngagementError, EngagementResult, ErrorKind};
pub use self::listing::{
    ArticleListing, ListingOrder, RandomArticles, RandomPageBound, RandomPageBoundParseError,
};
pub use self::sampling::{
    SamplingGate, SamplingMode, SamplingModeParseError, SamplingRatio,
};

const LOG_TARGET: &str = "gazette::engagement";

#[derive(Debug, Clone)]
pub struct Engine {
    db: Arc<Database>,
    aggregator: Arc<ReportAggregator>,
    engagement: EngagementMachine,
    listing: ArticleListing,
}

#[bon::bon]
impl Engine {
    #[builder(finish_fn(name = "build"))]
    pub fn new(
        db: Arc<Database>,
        #[builder(default)] sampling: SamplingMode,
        #[builder(default)] day_offset: DayOffset,
        #[builder(default)] random_page_bound: RandomPageBound,
        #[builder(default)] view_labels: ViewLabels,
    ) -> Self {
        info!(
            target: LOG_TARGET,
            %sampling,
            %day_offset,
            %random_page_bound,
            %view_labels,
            "Starting engagement engine"
        );

        let aggregator = Arc::new(ReportAggregator::new(
            db.clone(),
            SamplingGate::new(sampling),
            day_offset,
        ));

        Self {
            engagement: EngagementMachine::new(db.clone(), aggregator.clone(), view_labels),
            listing: ArticleListing::new(db.clone(), random_page_bound),
            aggregator,
            db,
        }
    }
}

impl Engine {
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn engagement(&self) -> &EngagementMachine {
        &self.engagement
    }

    pub fn aggregator(&self) -> &ReportAggregator {
        &self.aggregator
    }

    pub fn listing(&self) -> &ArticleListing {
        &self.listing
    }

    /// Register a member so engagement can be tracked for them
    pub async fn add_member(&self, member_id: MemberId) -> EngagementResult<()> {
        ensure!(
            self.db.insert_member(member_id).await?,
            error::MemberExistsSnafu { member_id }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
