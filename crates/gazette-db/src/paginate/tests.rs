use gazette_util_error::BoxedErrorResult;

use crate::tests::temp_db;
use crate::{Database, def_table};

def_table!(test_table: u64 => String);

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn paginate_skip() -> BoxedErrorResult<()> {
    let (_dir, db) = temp_db().await?;

    db.write_with(|tx| {
        let mut table = tx.open_table(&test_table::TABLE)?;

        table.insert(&0, "Zero")?;
        table.insert(&3, "Three")?;
        table.insert(&7, "Seven")?;

        let fmt = |k: u64, v: String| Ok(Some(format!("{k}-{v}")));

        assert_eq!(
            Database::paginate_table_skip(&table, 0..=u64::MAX, 0, 0, fmt)?,
            Vec::<String>::new()
        );
        assert_eq!(
            Database::paginate_table_skip(&table, 0..=u64::MAX, 0, 2, fmt)?,
            vec!["0-Zero".to_string(), "3-Three".into()]
        );
        assert_eq!(
            Database::paginate_table_skip(&table, 0..=u64::MAX, 2, 2, fmt)?,
            vec!["7-Seven".to_string()]
        );
        assert_eq!(
            Database::paginate_table_skip(&table, 0..=u64::MAX, 3, 2, fmt)?,
            Vec::<String>::new()
        );
        assert_eq!(
            Database::paginate_table_skip(&table, 1..=7, 0, 5, fmt)?,
            vec!["3-Three".to_string(), "7-Seven".into()]
        );

        // filtered-out records do not count towards `skip`
        assert_eq!(
            Database::paginate_table_skip(&table, 0..=u64::MAX, 1, 5, |k, v| Ok((k != 0)
                .then_some(v)))?,
            vec!["Seven".to_string()]
        );

        Ok(())
    })
    .await?;

    Ok(())
}
