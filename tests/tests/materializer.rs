use flightdesk::stmt::{Record, Statement};
use pretty_assertions::assert_eq;
use tests::{fixture, tests, DbTest};

async fn rows_keep_database_order(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::customers(&db, [3, 1, 2]).await;

    let rows = db
        .query(Statement::new(
            "SELECT id, fname, CAST(NULL AS TEXT) AS nickname FROM customer ORDER BY id DESC",
        ))
        .await
        .unwrap();

    assert_eq!(rows.columns(), ["id", "fname", "nickname"]);
    assert_eq!(rows.len(), 3);

    let records: Vec<Record> = rows.clone().into_iter().collect();
    assert_eq!(
        records,
        vec![
            Record::from_vec(vec![Some("3".into()), Some("First3".into()), None]),
            Record::from_vec(vec![Some("2".into()), Some("First2".into()), None]),
            Record::from_vec(vec![Some("1".into()), Some("First1".into()), None]),
        ]
    );

    assert_eq!(
        rows.to_string(),
        "id\tfname\tnickname\n3\tFirst3\t\n2\tFirst2\t\n1\tFirst1\t\n"
    );
}

async fn empty_result_keeps_columns(test: &mut DbTest) {
    let db = test.setup_db().await;

    let rows = db
        .query(Statement::new("SELECT id, fname FROM customer WHERE id = ").param(42))
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(rows.columns(), ["id", "fname"]);
    assert_eq!(rows.to_string(), "id\tfname\n");
}

async fn scalar_results(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::customers(&db, 1..=4).await;

    let rows = db
        .query(Statement::new("SELECT COUNT(*) FROM customer"))
        .await
        .unwrap();
    assert_eq!(rows.scalar_i64().unwrap(), 4);

    let rows = db
        .query(Statement::new("SELECT id FROM customer"))
        .await
        .unwrap();
    assert!(rows.scalar_i64().unwrap_err().is_invalid_result());
}

async fn execute_reports_rows_affected(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::customers(&db, 1..=5).await;

    let count = db
        .execute(
            Statement::new("UPDATE customer SET lname = ")
                .param("Smith")
                .sql(" WHERE id > ")
                .param(2),
        )
        .await
        .unwrap();
    assert_eq!(count, 3);

    let count = db
        .execute(Statement::new("DELETE FROM customer WHERE id = ").param(99))
        .await
        .unwrap();
    assert_eq!(count, 0);
}

async fn malformed_statements(test: &mut DbTest) {
    let db = test.setup_db().await;

    let err = db
        .query(Statement::new("SELECT * FROM no_such_table"))
        .await
        .unwrap_err();
    assert!(err.is_query_failed(), "{err}");

    let err = db
        .execute(Statement::new("UPDATE no_such_table SET x = 1"))
        .await
        .unwrap_err();
    assert!(err.is_mutation_failed(), "{err}");

    // The connection stays usable.
    db.query(Statement::new("SELECT COUNT(*) FROM customer"))
        .await
        .unwrap();
}

async fn closed_handle_is_a_connectivity_error(test: &mut DbTest) {
    let db = test.setup_db().await;
    let other = db.clone();

    db.close().await;
    assert!(other.is_closed().await);

    let err = other
        .query(Statement::new("SELECT COUNT(*) FROM customer"))
        .await
        .unwrap_err();
    assert!(err.is_connectivity(), "{err}");

    let err = other.book("1", "1").await.unwrap_err();
    assert!(err.is_connectivity(), "{err}");
}

tests!(
    rows_keep_database_order,
    empty_result_keeps_columns,
    scalar_results,
    execute_reports_rows_affected,
    malformed_statements,
    closed_handle_is_a_connectivity_error,
);
