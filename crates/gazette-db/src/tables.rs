use gazette_core::{ArticleId, MemberId, ReportKind, Timestamp};

pub use self::article::ArticleRecord;
pub use self::member::{EngagementSeq, MemberRecord};
pub use self::report::ReportBucketRecord;

pub(crate) mod article;
pub(crate) mod member;
pub(crate) mod report;

#[macro_export]
macro_rules! def_table {
    ($(#[$outer:meta])*
        $name:ident : $k:ty => $v:ty) => {
        #[allow(unused)]
        $(#[$outer])*
        pub mod $name {
            use super::*;
            pub type Key = $k;
            pub type Value = $v;
            pub type Definition<'a> = redb_bincode::TableDefinition<'a, Key, Value>;
            pub trait ReadableTable: redb_bincode::ReadableTable<Key, Value> {}
            impl<RT> ReadableTable for RT where RT: redb_bincode::ReadableTable<Key, Value> {}
            pub type Table<'a> = redb_bincode::Table<'a, Key, Value>;
            pub const TABLE: Definition = redb_bincode::TableDefinition::new(stringify!($name));
        }
    };
}

def_table! {
    /// Tracks database/schema version
    db_version: () => u64
}

// MEMBERS
def_table!(members: MemberId => MemberRecord);
def_table! {
    /// Saved articles as a set; value is the insertion sequence
    members_saved: (MemberId, ArticleId) => EngagementSeq
}
def_table! {
    /// Saved articles in the order they were saved
    members_saved_order: (MemberId, EngagementSeq) => ArticleId
}
def_table! {
    /// Viewed articles in view order, repeated views included
    members_viewed: (MemberId, EngagementSeq) => ArticleId
}
def_table!(members_published: (MemberId, ArticleId) => EngagementSeq);
def_table!(members_published_order: (MemberId, EngagementSeq) => ArticleId);

// ARTICLES
def_table!(articles: ArticleId => ArticleRecord);
def_table! {
    /// Publication-time index of `articles`
    articles_by_time: (Timestamp, ArticleId) => ()
}

// REPORTS
def_table! {
    /// Daily report buckets, keyed by local midnight and report kind
    ///
    /// The compound key is what keeps a single bucket per day and kind.
    reports: (Timestamp, ReportKind) => ReportBucketRecord
}

