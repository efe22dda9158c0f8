use flightdesk::{
    accessor,
    model::{BookingStatus, ReservationNumber, ReservationStatus},
    stmt::Statement,
    Db,
};
use pretty_assertions::assert_eq;
use tests::{fixture, tests, DbTest};

/// Flight 7 with one seat taken by customer 1 (reservation 1) and customer 2
/// waitlisted (reservation 2).
async fn setup(test: &mut DbTest) -> Db {
    let db = test.setup_db().await;
    fixture::flight(&db, 7, 1, 0).await;
    fixture::customers(&db, [1, 2]).await;

    assert_eq!(db.book("1", "7").await.unwrap().status, BookingStatus::Reserved);
    assert_eq!(
        db.waitlist("2", "7").await.unwrap().status,
        BookingStatus::Waitlisted
    );

    db
}

async fn confirm_while_full_stays_waitlisted(test: &mut DbTest) {
    let db = setup(test).await;

    let outcome = db.confirm_waitlisted(ReservationNumber(2)).await.unwrap();

    assert_eq!(outcome.status, BookingStatus::Declined);
    assert_eq!(outcome.reservation_number, Some(ReservationNumber(2)));
    assert_eq!(
        accessor::reservation_status(&mut db.clone(), ReservationNumber(2))
            .await
            .unwrap(),
        ReservationStatus::Waitlisted
    );
    assert_eq!(fixture::num_sold(&db, 7).await, 1);
}

async fn confirm_after_seat_frees_up(test: &mut DbTest) {
    let db = setup(test).await;

    // A seat was added to the plane.
    db.execute(Statement::new("UPDATE plane SET seats = 2 WHERE id = ").param(7))
        .await
        .unwrap();

    let outcome = db.confirm_waitlisted(ReservationNumber(2)).await.unwrap();

    assert_eq!(outcome.status, BookingStatus::Reserved);
    assert_eq!(fixture::num_sold(&db, 7).await, 2);
    assert_eq!(
        fixture::reservations(&db, 7).await,
        vec![(1, 1, "R".to_string()), (2, 2, "R".to_string())]
    );
}

async fn cancel_waitlisted(test: &mut DbTest) {
    let db = setup(test).await;

    db.cancel_waitlisted(ReservationNumber(2)).await.unwrap();

    assert_eq!(
        accessor::reservation_status(&mut db.clone(), ReservationNumber(2))
            .await
            .unwrap(),
        ReservationStatus::Cancelled
    );
    assert_eq!(fixture::num_sold(&db, 7).await, 1);

    // Cancelled is final.
    let err = db.cancel_waitlisted(ReservationNumber(2)).await.unwrap_err();
    assert!(err.is_invalid_input(), "{err}");
    assert!(err.to_string().contains("cancelled"), "{err}");

    let err = db.confirm_waitlisted(ReservationNumber(2)).await.unwrap_err();
    assert!(err.is_invalid_input(), "{err}");
}

async fn reserved_cannot_be_cancelled_through_waitlist(test: &mut DbTest) {
    let db = setup(test).await;

    let err = db.cancel_waitlisted(ReservationNumber(1)).await.unwrap_err();

    assert!(err.is_invalid_input(), "{err}");
    assert_eq!(
        err.to_string(),
        "invalid input for reservation status: `reservation 1 is reserved and cannot become cancelled`"
    );
    assert_eq!(
        accessor::reservation_status(&mut db.clone(), ReservationNumber(1))
            .await
            .unwrap(),
        ReservationStatus::Reserved
    );
}

async fn unknown_reservation(test: &mut DbTest) {
    let db = setup(test).await;

    let err = db.confirm_waitlisted(ReservationNumber(99)).await.unwrap_err();
    assert!(err.is_not_found(), "{err}");

    let err = db.cancel_waitlisted(ReservationNumber(99)).await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

tests!(
    confirm_while_full_stays_waitlisted,
    confirm_after_seat_frees_up,
    cancel_waitlisted,
    reserved_cannot_be_cancelled_through_waitlist,
    unknown_reservation,
);
