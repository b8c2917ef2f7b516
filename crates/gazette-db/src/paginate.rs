use std::ops;

use crate::{Database, DbResult};

impl Database {
    /// Walk `range` in key order, skipping the first `skip` accepted records
    /// and collecting at most `limit` more
    ///
    /// `filter_fn` returning `None` drops a record without counting it
    /// towards either `skip` or `limit`.
    pub fn paginate_table_skip<K, V, R>(
        table: &impl redb_bincode::ReadableTable<K, V>,
        range: ops::RangeInclusive<K>,
        skip: usize,
        limit: usize,
        filter_fn: impl Fn(K, V) -> DbResult<Option<R>>,
    ) -> DbResult<Vec<R>>
    where
        K: bincode::Decode<()> + bincode::Encode,
        V: bincode::Decode<()> + bincode::Encode,
    {
        let mut ret = vec![];
        let mut skipped = 0;

        for record in table.range(range)? {
            if limit <= ret.len() {
                break;
            }
            let (k, v) = record?;

            if let Some(r) = filter_fn(k.value(), v.value())? {
                if skipped < skip {
                    skipped += 1;
                    continue;
                }
                ret.push(r);
            }
        }

        Ok(ret)
    }
}

#[cfg(test)]
mod tests;
