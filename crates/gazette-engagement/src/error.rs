use std::fmt;

use gazette_core::{ArticleId, MemberId};
use gazette_db::DbError;
use snafu::Snafu;

/// Coarse class of an [`EngagementError`], for callers that only care about
/// what kind of failure to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced member, article or bucket does not exist
    NotFound,
    /// The request itself is malformed
    Validation,
    /// The transition is not allowed in the current state
    Conflict,
    /// Storage failure
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EngagementError {
    #[snafu(display("Article not found: {article_id}"))]
    ArticleNotFound { article_id: ArticleId },
    #[snafu(display("Member not found: {member_id}"))]
    MemberNotFound { member_id: MemberId },
    #[snafu(display("Article {article_id} is not saved by member {member_id}"))]
    NotSaved {
        member_id: MemberId,
        article_id: ArticleId,
    },
    #[snafu(display("Member id is required"))]
    MissingMemberId,
    #[snafu(display("Invalid page request: page {page}, size {size}"))]
    InvalidPage { page: u32, size: u32 },
    #[snafu(display("Article already published: {article_id}"))]
    AlreadyPublished { article_id: ArticleId },
    #[snafu(display("Member already exists: {member_id}"))]
    MemberExists { member_id: MemberId },
    #[snafu(transparent)]
    Database { source: DbError },
}

pub type EngagementResult<T> = std::result::Result<T, EngagementError>;

impl EngagementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngagementError::ArticleNotFound { .. }
            | EngagementError::MemberNotFound { .. }
            | EngagementError::NotSaved { .. } => ErrorKind::NotFound,
            EngagementError::MissingMemberId | EngagementError::InvalidPage { .. } => {
                ErrorKind::Validation
            }
            EngagementError::AlreadyPublished { .. } | EngagementError::MemberExists { .. } => {
                ErrorKind::Conflict
            }
            EngagementError::Database { .. } => ErrorKind::Internal,
        }
    }
}
