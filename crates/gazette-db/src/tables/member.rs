//! Member-related database record types.
//!
//! A member's engagement lists live in their own tables, keyed by
//! `(member_id, ..)`, so that membership checks and ordered listing are both
//! range lookups instead of scans over a stored list.

use bincode::{Decode, Encode};
use gazette_core::Timestamp;
use serde::Serialize;

/// Position of an entry in one of the member's engagement lists
///
/// Allocated from [`MemberRecord::next_seq`], so it only ever grows and
/// preserves insertion order across all lists of a member.
pub type EngagementSeq = u64;

/// Record for the `members` table.
#[derive(Debug, Encode, Decode, Clone, Serialize)]
pub struct MemberRecord {
    /// When the member was first stored
    pub created: Timestamp,
    /// Next free [`EngagementSeq`]
    pub next_seq: EngagementSeq,
}

impl MemberRecord {
    pub fn new(created: Timestamp) -> Self {
        Self {
            created,
            next_seq: 0,
        }
    }

    /// Take the next sequence number
    pub(crate) fn alloc_seq(&mut self) -> EngagementSeq {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
