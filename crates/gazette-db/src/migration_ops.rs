use redb_bincode::{ReadableTable as _, WriteTransaction};
use tracing::{debug, info};

use crate::{
    Database, DbResult, DbVersionTooHighSnafu, LOG_TARGET, articles, articles_by_time,
    db_version, members, members_published, members_published_order, members_saved,
    members_saved_order, members_viewed, reports,
};

impl Database {
    const DB_VER: u64 = 0;

    pub(crate) fn init_tables_tx(tx: &WriteTransaction) -> DbResult<()> {
        tx.open_table(&db_version::TABLE)?;

        tx.open_table(&members::TABLE)?;
        tx.open_table(&members_saved::TABLE)?;
        tx.open_table(&members_saved_order::TABLE)?;
        tx.open_table(&members_viewed::TABLE)?;
        tx.open_table(&members_published::TABLE)?;
        tx.open_table(&members_published_order::TABLE)?;

        tx.open_table(&articles::TABLE)?;
        tx.open_table(&articles_by_time::TABLE)?;

        tx.open_table(&reports::TABLE)?;
        Ok(())
    }

    pub(crate) fn handle_db_ver_migrations(dbtx: &WriteTransaction) -> DbResult<()> {
        let mut table_db_ver = dbtx.open_table(&db_version::TABLE)?;

        let Some(cur_db_ver) = table_db_ver.get(&())?.map(|g| g.value()) else {
            info!(target: LOG_TARGET, db_ver = Self::DB_VER, "Initializing new database");
            table_db_ver.insert(&(), &Self::DB_VER)?;

            return Ok(());
        };

        if Self::DB_VER < cur_db_ver {
            return DbVersionTooHighSnafu {
                db_ver: cur_db_ver,
                code_ver: Self::DB_VER,
            }
            .fail();
        }

        debug!(target: LOG_TARGET, db_ver = cur_db_ver, "Db version");

        Ok(())
    }
}
