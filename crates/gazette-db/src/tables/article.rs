use std::collections::BTreeSet;

use bincode::{Decode, Encode};
use gazette_core::{Article, ArticleId, Timestamp};
use serde::Serialize;

/// Record for the `articles` table.
#[derive(Debug, Encode, Decode, Clone, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub topics: BTreeSet<String>,
    pub labels: BTreeSet<String>,
    pub published: Timestamp,
}

impl ArticleRecord {
    pub fn into_article(self, id: ArticleId) -> Article {
        Article {
            id,
            title: self.title,
            topics: self.topics,
            labels: self.labels,
            published: self.published,
        }
    }
}

impl From<&Article> for ArticleRecord {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            topics: article.topics.clone(),
            labels: article.labels.clone(),
            published: article.published,
        }
    }
}
