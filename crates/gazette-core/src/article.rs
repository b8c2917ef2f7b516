use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

use crate::{ArticleId, Timestamp};

/// An article as seen by the engagement subsystem
///
/// Read-only from the point of view of engagement tracking: it is only ever
/// looked up, listed, and used as a source of labels for view reports.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Topic labels, picked from a curated set
    #[cfg_attr(feature = "serde", serde(default))]
    pub topics: BTreeSet<String>,
    /// Free-form labels
    #[cfg_attr(feature = "serde", serde(default))]
    pub labels: BTreeSet<String>,
    /// Publication time
    pub published: Timestamp,
}

impl Article {
    /// Labels a view of this article counts toward
    pub fn report_labels(&self) -> BTreeSet<String> {
        self.topics.union(&self.labels).cloned().collect()
    }
}

/// One of the three per-member engagement lists
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementList {
    Saved,
    Viewed,
    Published,
}

impl EngagementList {
    pub const ALL: [EngagementList; 3] = [Self::Saved, Self::Viewed, Self::Published];

    pub fn as_str(self) -> &'static str {
        match self {
            EngagementList::Saved => "saved",
            EngagementList::Viewed => "viewed",
            EngagementList::Published => "published",
        }
    }
}

impl fmt::Display for EngagementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown {what}: {value}"))]
pub struct UnknownVariantError {
    what: &'static str,
    value: String,
}

impl FromStr for EngagementList {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|list| list.as_str() == s)
            .ok_or_else(|| UnknownVariantError {
                what: "engagement list",
                value: s.to_owned(),
            })
    }
}

/// Kind of a daily report bucket
///
/// Only view reports exist for now, but buckets are keyed by kind so others
/// can be added without a migration.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "bincode", derive(::bincode::Encode, ::bincode::Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKind {
    View,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::View => "view",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(ReportKind::View),
            _ => Err(UnknownVariantError {
                what: "report kind",
                value: s.to_owned(),
            }),
        }
    }
}
