use redb_bincode::{ReadTransaction, ReadableTable as _};
use serde_json::Value;
use snafu::ResultExt as _;

use crate::{
    Database, DbResult, JsonSnafu, UnknownTableSnafu, articles, articles_by_time, db_version,
    members, members_published, members_published_order, members_saved, members_saved_order,
    members_viewed, reports,
};

/// `(key, value)` pair of a dumped record
pub type DumpedRecord = (Value, Value);

impl Database {
    pub const TABLE_NAMES: &'static [&'static str] = &[
        "db_version",
        "members",
        "members_saved",
        "members_saved_order",
        "members_viewed",
        "members_published",
        "members_published_order",
        "articles",
        "articles_by_time",
        "reports",
    ];

    pub(crate) fn dump_table_dbtx<K, V>(
        dbtx: &ReadTransaction,
        def: &redb_bincode::TableDefinition<'_, K, V>,
    ) -> DbResult<Vec<DumpedRecord>>
    where
        V: bincode::Decode<()> + bincode::Encode + serde::Serialize,
        K: bincode::Decode<()> + bincode::Encode + serde::Serialize,
    {
        let tbl = dbtx.open_table(def)?;
        let mut ret = vec![];
        for record in tbl.range(..)? {
            let (k, v) = record?;
            ret.push((
                serde_json::to_value(k.value()).context(JsonSnafu)?,
                serde_json::to_value(v.value()).context(JsonSnafu)?,
            ));
        }
        Ok(ret)
    }

    /// Every record of the table called `name`, for debugging
    pub async fn dump_table(&self, name: &str) -> DbResult<Vec<DumpedRecord>> {
        self.read_with(|tx| match name {
            "db_version" => Self::dump_table_dbtx(tx, &db_version::TABLE),
            "members" => Self::dump_table_dbtx(tx, &members::TABLE),
            "members_saved" => Self::dump_table_dbtx(tx, &members_saved::TABLE),
            "members_saved_order" => Self::dump_table_dbtx(tx, &members_saved_order::TABLE),
            "members_viewed" => Self::dump_table_dbtx(tx, &members_viewed::TABLE),
            "members_published" => Self::dump_table_dbtx(tx, &members_published::TABLE),
            "members_published_order" => {
                Self::dump_table_dbtx(tx, &members_published_order::TABLE)
            }
            "articles" => Self::dump_table_dbtx(tx, &articles::TABLE),
            "articles_by_time" => Self::dump_table_dbtx(tx, &articles_by_time::TABLE),
            "reports" => Self::dump_table_dbtx(tx, &reports::TABLE),
            _ => UnknownTableSnafu { name }.fail(),
        })
        .await
    }
}
