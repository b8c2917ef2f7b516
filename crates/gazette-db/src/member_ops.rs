use gazette_core::{Article, ArticleId, EngagementList, MemberId, Timestamp};
use redb_bincode::{ReadTransaction, ReadableTable};
use serde::Serialize;
use tracing::debug;

use crate::{
    Database, DbResult, EngagementSeq, LOG_TARGET, MemberRecord, articles,
    articles_by_time, members, members_published, members_published_order, members_saved,
    members_saved_order, members_viewed,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Was already saved, nothing changed
    AlreadySaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsaveOutcome {
    Unsaved,
    /// Was not saved, nothing changed
    NotSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Viewed,
    /// Saved articles do not get view entries
    SuppressedSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    /// An article with this id is already stored
    ArticleExists,
}

/// All three engagement lists of a member, each in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagementLists {
    pub saved: Vec<ArticleId>,
    pub viewed: Vec<ArticleId>,
    pub published: Vec<ArticleId>,
}

fn member_seq_range(
    member_id: MemberId,
) -> std::ops::RangeInclusive<(MemberId, EngagementSeq)> {
    (member_id, EngagementSeq::MIN)..=(member_id, EngagementSeq::MAX)
}

impl Database {
    pub fn insert_member_tx(
        member_id: MemberId,
        now: Timestamp,
        members_table: &mut members::Table,
    ) -> DbResult<bool> {
        if members_table.get(&member_id)?.is_some() {
            return Ok(false);
        }
        members_table.insert(&member_id, &MemberRecord::new(now))?;
        Ok(true)
    }

    pub fn get_member_tx(
        member_id: MemberId,
        members_table: &impl members::ReadableTable,
    ) -> DbResult<Option<MemberRecord>> {
        Ok(members_table.get(&member_id)?.map(|g| g.value()))
    }

    pub fn is_saved_tx(
        member_id: MemberId,
        article_id: ArticleId,
        members_saved_table: &impl members_saved::ReadableTable,
    ) -> DbResult<bool> {
        Ok(members_saved_table
            .get(&(member_id, article_id))?
            .is_some())
    }

    /// Add to the saved set, keeping insertion order
    ///
    /// Returns `None` if the member does not exist.
    pub fn save_article_tx(
        member_id: MemberId,
        article_id: ArticleId,
        members_table: &mut members::Table,
        members_saved_table: &mut members_saved::Table,
        members_saved_order_table: &mut members_saved_order::Table,
    ) -> DbResult<Option<SaveOutcome>> {
        let Some(mut member) = Self::get_member_tx(member_id, &*members_table)? else {
            return Ok(None);
        };

        if Self::is_saved_tx(member_id, article_id, &*members_saved_table)? {
            return Ok(Some(SaveOutcome::AlreadySaved));
        }

        let seq = member.alloc_seq();
        members_saved_table.insert(&(member_id, article_id), &seq)?;
        members_saved_order_table.insert(&(member_id, seq), &article_id)?;
        members_table.insert(&member_id, &member)?;

        Ok(Some(SaveOutcome::Saved))
    }

    /// Returns `None` if the member does not exist.
    pub fn unsave_article_tx(
        member_id: MemberId,
        article_id: ArticleId,
        members_table: &impl members::ReadableTable,
        members_saved_table: &mut members_saved::Table,
        members_saved_order_table: &mut members_saved_order::Table,
    ) -> DbResult<Option<UnsaveOutcome>> {
        if Self::get_member_tx(member_id, members_table)?.is_none() {
            return Ok(None);
        }

        let Some(seq) = members_saved_table
            .remove(&(member_id, article_id))?
            .map(|g| g.value())
        else {
            return Ok(Some(UnsaveOutcome::NotSaved));
        };
        members_saved_order_table.remove(&(member_id, seq))?;

        Ok(Some(UnsaveOutcome::Unsaved))
    }

    /// Append to the viewed list, unless the article is saved
    ///
    /// Repeated views of the same article are all recorded. Returns `None` if
    /// the member does not exist.
    pub fn view_article_tx(
        member_id: MemberId,
        article_id: ArticleId,
        members_table: &mut members::Table,
        members_saved_table: &impl members_saved::ReadableTable,
        members_viewed_table: &mut members_viewed::Table,
    ) -> DbResult<Option<ViewOutcome>> {
        let Some(mut member) = Self::get_member_tx(member_id, &*members_table)? else {
            return Ok(None);
        };

        if Self::is_saved_tx(member_id, article_id, members_saved_table)? {
            return Ok(Some(ViewOutcome::SuppressedSaved));
        }

        let seq = member.alloc_seq();
        members_viewed_table.insert(&(member_id, seq), &article_id)?;
        members_table.insert(&member_id, &member)?;

        Ok(Some(ViewOutcome::Viewed))
    }

    /// Store a new article and append it to its author's published list
    ///
    /// Returns `None` if the member does not exist.
    #[allow(clippy::too_many_arguments)]
    pub fn publish_article_tx(
        member_id: MemberId,
        article: &Article,
        members_table: &mut members::Table,
        members_published_table: &mut members_published::Table,
        members_published_order_table: &mut members_published_order::Table,
        articles_table: &mut articles::Table,
        articles_by_time_table: &mut articles_by_time::Table,
    ) -> DbResult<Option<PublishOutcome>> {
        let Some(mut member) = Self::get_member_tx(member_id, &*members_table)? else {
            return Ok(None);
        };

        if !Self::insert_article_tx(article, articles_table, articles_by_time_table)? {
            return Ok(Some(PublishOutcome::ArticleExists));
        }

        let seq = member.alloc_seq();
        members_published_table.insert(&(member_id, article.id), &seq)?;
        members_published_order_table.insert(&(member_id, seq), &article.id)?;
        members_table.insert(&member_id, &member)?;

        Ok(Some(PublishOutcome::Published))
    }

    /// Read one of the `(member, seq) => article` order tables
    pub fn read_engagement_list_tx(
        member_id: MemberId,
        order_table: &impl ReadableTable<(MemberId, EngagementSeq), ArticleId>,
    ) -> DbResult<Vec<ArticleId>> {
        Ok(order_table
            .range(member_seq_range(member_id))?
            .map(|res| res.map(|(_, v)| v.value()))
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn read_engagement_list_dbtx(
        member_id: MemberId,
        list: EngagementList,
        tx: &ReadTransaction,
    ) -> DbResult<Vec<ArticleId>> {
        match list {
            EngagementList::Saved => Self::read_engagement_list_tx(
                member_id,
                &tx.open_table(&members_saved_order::TABLE)?,
            ),
            EngagementList::Viewed => Self::read_engagement_list_tx(
                member_id,
                &tx.open_table(&members_viewed::TABLE)?,
            ),
            EngagementList::Published => Self::read_engagement_list_tx(
                member_id,
                &tx.open_table(&members_published_order::TABLE)?,
            ),
        }
    }
}

impl Database {
    pub async fn insert_member(&self, member_id: MemberId) -> DbResult<bool> {
        let inserted = self
            .write_with(|tx| {
                Self::insert_member_tx(
                    member_id,
                    Timestamp::now(),
                    &mut tx.open_table(&members::TABLE)?,
                )
            })
            .await?;
        debug!(target: LOG_TARGET, %member_id, inserted, "Insert member");
        Ok(inserted)
    }

    pub async fn has_member(&self, member_id: MemberId) -> DbResult<bool> {
        self.read_with(|tx| {
            Ok(Self::get_member_tx(member_id, &tx.open_table(&members::TABLE)?)?.is_some())
        })
        .await
    }

    pub async fn save_article(
        &self,
        member_id: MemberId,
        article_id: ArticleId,
    ) -> DbResult<Option<SaveOutcome>> {
        let outcome = self
            .write_with(|tx| {
                Self::save_article_tx(
                    member_id,
                    article_id,
                    &mut tx.open_table(&members::TABLE)?,
                    &mut tx.open_table(&members_saved::TABLE)?,
                    &mut tx.open_table(&members_saved_order::TABLE)?,
                )
            })
            .await?;
        debug!(target: LOG_TARGET, %member_id, %article_id, ?outcome, "Save article");
        Ok(outcome)
    }

    pub async fn unsave_article(
        &self,
        member_id: MemberId,
        article_id: ArticleId,
    ) -> DbResult<Option<UnsaveOutcome>> {
        let outcome = self
            .write_with(|tx| {
                Self::unsave_article_tx(
                    member_id,
                    article_id,
                    &tx.open_table(&members::TABLE)?,
                    &mut tx.open_table(&members_saved::TABLE)?,
                    &mut tx.open_table(&members_saved_order::TABLE)?,
                )
            })
            .await?;
        debug!(target: LOG_TARGET, %member_id, %article_id, ?outcome, "Unsave article");
        Ok(outcome)
    }

    pub async fn view_article(
        &self,
        member_id: MemberId,
        article_id: ArticleId,
    ) -> DbResult<Option<ViewOutcome>> {
        let outcome = self
            .write_with(|tx| {
                Self::view_article_tx(
                    member_id,
                    article_id,
                    &mut tx.open_table(&members::TABLE)?,
                    &tx.open_table(&members_saved::TABLE)?,
                    &mut tx.open_table(&members_viewed::TABLE)?,
                )
            })
            .await?;
        debug!(target: LOG_TARGET, %member_id, %article_id, ?outcome, "View article");
        Ok(outcome)
    }

    pub async fn publish_article(
        &self,
        member_id: MemberId,
        article: &Article,
    ) -> DbResult<Option<PublishOutcome>> {
        let outcome = self
            .write_with(|tx| {
                Self::publish_article_tx(
                    member_id,
                    article,
                    &mut tx.open_table(&members::TABLE)?,
                    &mut tx.open_table(&members_published::TABLE)?,
                    &mut tx.open_table(&members_published_order::TABLE)?,
                    &mut tx.open_table(&articles::TABLE)?,
                    &mut tx.open_table(&articles_by_time::TABLE)?,
                )
            })
            .await?;
        debug!(target: LOG_TARGET, %member_id, article_id = %article.id, ?outcome, "Publish article");
        Ok(outcome)
    }

    /// One engagement list of a member, `None` if the member does not exist
    pub async fn get_engagement_list(
        &self,
        member_id: MemberId,
        list: EngagementList,
    ) -> DbResult<Option<Vec<ArticleId>>> {
        self.read_with(|tx| {
            if Self::get_member_tx(member_id, &tx.open_table(&members::TABLE)?)?.is_none() {
                return Ok(None);
            }
            Ok(Some(Self::read_engagement_list_dbtx(member_id, list, tx)?))
        })
        .await
    }

    /// All engagement lists of a member, `None` if the member does not exist
    pub async fn get_engagement_lists(
        &self,
        member_id: MemberId,
    ) -> DbResult<Option<EngagementLists>> {
        self.read_with(|tx| {
            if Self::get_member_tx(member_id, &tx.open_table(&members::TABLE)?)?.is_none() {
                return Ok(None);
            }
            Ok(Some(EngagementLists {
                saved: Self::read_engagement_list_dbtx(member_id, EngagementList::Saved, tx)?,
                viewed: Self::read_engagement_list_dbtx(member_id, EngagementList::Viewed, tx)?,
                published: Self::read_engagement_list_dbtx(
                    member_id,
                    EngagementList::Published,
                    tx,
                )?,
            }))
        })
        .await
    }
}
