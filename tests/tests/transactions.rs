use flightdesk::{
    err,
    model::{BookingStatus, CustomerId},
    stmt::Statement,
    Db, Error, Executor,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tests::{fixture, tests, DbTest};

fn insert_customer(id: i64) -> Statement {
    Statement::new("INSERT INTO customer (id, fname, lname) VALUES (")
        .param(id)
        .sql(", 'Tx', 'Test')")
}

async fn count_customers(db: &Db) -> i64 {
    db.query(Statement::new("SELECT COUNT(*) FROM customer"))
        .await
        .unwrap()
        .scalar_i64()
        .unwrap()
}

async fn commit_persists(test: &mut DbTest) {
    let db = test.setup_db().await;

    let inserted = db
        .transaction(async |tx| {
            let mut count = tx.execute(insert_customer(1)).await?;
            count += tx.execute(insert_customer(2)).await?;
            Ok(count)
        })
        .await
        .unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(count_customers(&db).await, 2);
    assert_eq!(test.log().commits(), 1);
}

async fn error_rolls_back(test: &mut DbTest) {
    let db = test.setup_db().await;

    let err = db
        .transaction(async |tx| {
            tx.execute(insert_customer(1)).await?;
            Err::<(), _>(err!("changed my mind"))
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "changed my mind");
    assert_eq!(count_customers(&db).await, 0);
    assert_eq!(test.log().rollbacks(), 1);
}

async fn timeout_rolls_back(test: &mut DbTest) {
    let db = test.setup_db().await;

    let err = db
        .transaction_with_timeout(Duration::from_millis(50), async |tx| {
            tx.execute(insert_customer(1)).await?;
            tokio::time::sleep(Duration::from_secs(2)).await;
            tx.execute(insert_customer(2)).await?;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(err.is_transaction_timed_out(), "{err}");
    assert_eq!(count_customers(&db).await, 0);
    assert_eq!(test.log().rollbacks(), 1);
}

async fn configured_timeout_applies(test: &mut DbTest) {
    let db = test
        .try_setup_db(Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(db.transaction_timeout(), Duration::from_millis(50));

    let err = db
        .transaction(async |_tx| {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(err.is_transaction_timed_out(), "{err}");
    assert_eq!(err.to_string(), "transaction timed out after 50ms");
}

async fn transactions_are_serialized(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::customer(&db, 1).await;

    let set_lname = |lname: &str| {
        Statement::new("UPDATE customer SET lname = ")
            .param(lname)
            .sql(" WHERE id = ")
            .param(CustomerId(1))
    };

    let mut tx = db.begin().await.unwrap();
    tx.execute(set_lname("First")).await.unwrap();

    // The open transaction holds the only connection.
    let blocked = tokio::time::timeout(Duration::from_millis(20), db.execute(set_lname("Second")))
        .await;
    assert!(blocked.is_err(), "statement ran inside another transaction");

    tx.commit().await.unwrap();

    assert_eq!(db.execute(set_lname("Second")).await.unwrap(), 1);

    let rows = db
        .query(Statement::new("SELECT lname FROM customer WHERE id = ").param(1))
        .await
        .unwrap();
    assert_eq!(rows.first().unwrap().get(0), Some("Second"));
}

async fn dropped_transaction_rolls_back(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::flight(&db, 7, 5, 0).await;
    fixture::customer(&db, 3).await;

    let mut tx = db.begin().await.unwrap();
    tx.execute(insert_customer(1)).await.unwrap();
    drop(tx);

    assert_eq!(count_customers(&db).await, 1);
    assert_eq!(test.log().rollbacks(), 1);

    // The connection is usable for new transactions.
    let outcome = db.book("3", "7").await.unwrap();
    assert_eq!(outcome.status, BookingStatus::Reserved);
    assert_eq!(fixture::num_sold(&db, 7).await, 1);
}

async fn cancelled_transaction_rolls_back(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::flight(&db, 7, 5, 0).await;
    fixture::customer(&db, 3).await;

    let cancelled = tokio::time::timeout(
        Duration::from_millis(20),
        db.transaction(async |tx| {
            tx.execute(insert_customer(1)).await?;
            std::future::pending::<()>().await;
            Ok(())
        }),
    )
    .await;
    assert!(cancelled.is_err(), "transaction finished unexpectedly");

    assert_eq!(count_customers(&db).await, 1);

    let outcome = db.book("3", "7").await.unwrap();
    assert_eq!(outcome.status, BookingStatus::Reserved);

    let mut tx = db.begin().await.unwrap();
    tx.execute(insert_customer(2)).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(count_customers(&db).await, 2);
}

async fn failed_rollback_keeps_original_error(test: &mut DbTest) {
    let db = test.setup_db().await;

    let err = db
        .transaction(async |tx| {
            tx.execute(insert_customer(1)).await?;
            // Leaves the closing ROLLBACK with no transaction to end.
            tx.execute(Statement::new("ROLLBACK")).await?;
            Err::<(), _>(Error::invariant_violation("flight 7 has -1 seats remaining"))
        })
        .await
        .unwrap_err();

    assert!(err.is_invariant_violation(), "{err}");
    assert_eq!(count_customers(&db).await, 0);

    db.transaction(async |tx| tx.execute(insert_customer(2)).await)
        .await
        .unwrap();
    assert_eq!(count_customers(&db).await, 1);
}

tests!(
    commit_persists,
    error_rolls_back,
    timeout_rolls_back,
    configured_timeout_applies,
    transactions_are_serialized,
    dropped_transaction_rolls_back,
    cancelled_transaction_rolls_back,
    failed_rollback_keeps_original_error,
);
