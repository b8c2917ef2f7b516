use gazette_core::{Article, ArticleId, Timestamp};
use redb_bincode::ReadableTable as _;
use tracing::debug;

use crate::{ArticleRecord, Database, DbResult, LOG_TARGET, articles, articles_by_time};

impl Database {
    /// Store an article, returns `false` if one with the same id exists
    pub fn insert_article_tx(
        article: &Article,
        articles_table: &mut articles::Table,
        articles_by_time_table: &mut articles_by_time::Table,
    ) -> DbResult<bool> {
        if articles_table.get(&article.id)?.is_some() {
            return Ok(false);
        }

        articles_table.insert(&article.id, &ArticleRecord::from(article))?;
        articles_by_time_table.insert(&(article.published, article.id), &())?;

        Ok(true)
    }

    pub fn get_article_tx(
        article_id: ArticleId,
        articles_table: &impl articles::ReadableTable,
    ) -> DbResult<Option<Article>> {
        Ok(articles_table
            .get(&article_id)?
            .map(|g| g.value().into_article(article_id)))
    }

    pub async fn insert_article(&self, article: &Article) -> DbResult<bool> {
        let inserted = self
            .write_with(|tx| {
                Self::insert_article_tx(
                    article,
                    &mut tx.open_table(&articles::TABLE)?,
                    &mut tx.open_table(&articles_by_time::TABLE)?,
                )
            })
            .await?;
        debug!(target: LOG_TARGET, article_id = %article.id, inserted, "Insert article");
        Ok(inserted)
    }

    pub async fn get_article(&self, article_id: ArticleId) -> DbResult<Option<Article>> {
        self.read_with(|tx| Self::get_article_tx(article_id, &tx.open_table(&articles::TABLE)?))
            .await
    }

    /// Fetch the given articles in the given order, silently skipping
    /// ids that are not stored
    pub async fn get_articles(&self, article_ids: &[ArticleId]) -> DbResult<Vec<Article>> {
        self.read_with(|tx| {
            let articles_table = tx.open_table(&articles::TABLE)?;
            let mut ret = Vec::with_capacity(article_ids.len());
            for article_id in article_ids {
                if let Some(article) = Self::get_article_tx(*article_id, &articles_table)? {
                    ret.push(article);
                }
            }
            Ok(ret)
        })
        .await
    }

    pub async fn count_articles(&self) -> DbResult<u64> {
        self.read_with(|tx| {
            let mut count = 0;
            for record in tx.open_table(&articles_by_time::TABLE)?.range(..)? {
                record?;
                count += 1;
            }
            Ok(count)
        })
        .await
    }

    /// Articles ordered by publication time, oldest first
    pub async fn paginate_articles_by_time(
        &self,
        skip: usize,
        limit: usize,
    ) -> DbResult<Vec<Article>> {
        self.read_with(|tx| {
            let articles_table = tx.open_table(&articles::TABLE)?;
            let articles_by_time_table = tx.open_table(&articles_by_time::TABLE)?;

            Self::paginate_table_skip(
                &articles_by_time_table,
                (Timestamp::ZERO, ArticleId::ZERO)..=(Timestamp::MAX, ArticleId::MAX),
                skip,
                limit,
                |(_, article_id), ()| Self::get_article_tx(article_id, &articles_table),
            )
        })
        .await
    }
}
