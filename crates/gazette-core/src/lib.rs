#[macro_use]
mod macros;

pub mod article;
pub mod page;
#[cfg(feature = "rand")]
mod rand;
pub mod report;
pub mod time;

use std::fmt;

pub use self::article::{Article, EngagementList, ReportKind};
pub use self::page::{Page, PageRequest};
pub use self::report::ReportBucket;
pub use self::time::DayOffset;

array_type_define_public!(
    /// Identifier of an article
    struct ArticleId, 12
);
array_type_impl_hex_str!(ArticleId);
array_type_impl_serde!(struct ArticleId, 12);

array_type_define_public!(
    /// Identifier of a member (a registered reader or author)
    struct MemberId, 12
);
array_type_impl_hex_str!(MemberId);
array_type_impl_serde!(struct MemberId, 12);

array_type_define_public!(
    /// Identifier of a single report bucket
    struct ReportId, 12
);
array_type_impl_hex_str!(ReportId);
array_type_impl_serde!(struct ReportId, 12);

/// Seconds since the unix epoch
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "bincode", derive(::bincode::Encode, ::bincode::Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u64::MAX);

    pub fn now() -> Self {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| Self(d.as_secs()))
            .unwrap_or(Self::ZERO)
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Timestamp> for u64 {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests;
