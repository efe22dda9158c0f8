use flightdesk::{
    model::{FlightNumber, PlaneId, Repair, RepairId},
    stmt::RowSet,
    Db,
};
use pretty_assertions::assert_eq;
use tests::{fixture, tests, DbTest};

fn cells(rows: &RowSet) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|v| v.unwrap_or("").to_string()).collect())
        .collect()
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Planes 1, 2, and 3 with repairs spread over 2019 to 2021.
async fn seed_repairs(db: &Db) {
    for fnum in 1..=3 {
        fixture::flight(db, fnum, 10, 0).await;
    }

    let repairs = [
        (1, 1, "2019-05-01"),
        (2, 1, "2020-01-10"),
        (3, 1, "2020-07-07"),
        (4, 2, "2021-03-03"),
        (5, 3, "2019-02-02"),
        (6, 3, "2020-02-02"),
        (7, 3, "2021-02-02"),
    ];

    for (id, plane, date) in repairs {
        db.add_repair(&Repair {
            id: RepairId(id),
            plane: PlaneId(plane),
            date: date.to_string(),
        })
        .await
        .unwrap();
    }
}

async fn available_seats(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::flight(&db, 7, 5, 4).await;

    let rows = db.available_seats(FlightNumber(7)).await.unwrap();
    assert_eq!(rows.columns(), ["seats_remaining"]);
    assert_eq!(cells(&rows), vec![row(&["1"])]);

    let rows = db.available_seats(FlightNumber(8)).await.unwrap();
    assert_eq!(rows.columns(), ["seats_remaining"]);
    assert!(rows.is_empty());
}

async fn repairs_per_plane_most_first(test: &mut DbTest) {
    let db = test.setup_db().await;
    seed_repairs(&db).await;

    let rows = db.repairs_per_plane().await.unwrap();

    assert_eq!(rows.columns(), ["# Repairs", "Plane ID#"]);
    assert_eq!(
        cells(&rows),
        vec![row(&["3", "1"]), row(&["3", "3"]), row(&["1", "2"])]
    );
    assert_eq!(
        rows.to_string(),
        "# Repairs\tPlane ID#\n3\t1\n3\t3\n1\t2\n"
    );
}

async fn repairs_per_year_fewest_first(test: &mut DbTest) {
    let db = test.setup_db().await;
    seed_repairs(&db).await;

    let rows = db.repairs_per_year().await.unwrap();

    assert_eq!(rows.columns(), ["# Repairs", "Year"]);
    assert_eq!(
        cells(&rows),
        vec![
            row(&["2", "2019"]),
            row(&["2", "2021"]),
            row(&["3", "2020"]),
        ]
    );
}

async fn no_repairs(test: &mut DbTest) {
    let db = test.setup_db().await;

    let rows = db.repairs_per_plane().await.unwrap();
    assert_eq!(rows.columns(), ["# Repairs", "Plane ID#"]);
    assert!(rows.is_empty());

    let rows = db.repairs_per_year().await.unwrap();
    assert!(rows.is_empty());
}

async fn passengers_with_status_ignores_case(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::flight(&db, 10, 2, 0).await;
    fixture::customers(&db, 1..=4).await;

    db.book("1", "10").await.unwrap();
    db.book("2", "10").await.unwrap();
    db.waitlist("3", "10").await.unwrap();

    let upper = db.passengers_with_status(FlightNumber(10), "R").await.unwrap();
    let lower = db.passengers_with_status(FlightNumber(10), "r").await.unwrap();

    assert_eq!(upper, lower);
    assert_eq!(upper.columns(), ["# Customers with Status"]);
    assert_eq!(cells(&upper), vec![row(&["2"])]);

    let waitlisted = db
        .passengers_with_status(FlightNumber(10), " w ")
        .await
        .unwrap();
    assert_eq!(cells(&waitlisted), vec![row(&["1"])]);

    let cancelled = db.passengers_with_status(FlightNumber(10), "C").await.unwrap();
    assert_eq!(cells(&cancelled), vec![row(&["0"])]);
}

async fn unrecognized_status_is_empty(test: &mut DbTest) {
    let db = test.setup_db().await;
    fixture::flight(&db, 10, 2, 0).await;

    let mut log = test.log();
    log.clear();

    let rows = db
        .passengers_with_status(FlightNumber(10), "X' OR '1'='1")
        .await
        .unwrap();

    assert_eq!(rows.columns(), ["# Customers with Status"]);
    assert!(rows.is_empty());
    assert!(log.is_empty());
}

tests!(
    available_seats,
    repairs_per_plane_most_first,
    repairs_per_year_fewest_first,
    no_repairs,
    passengers_with_status_ignores_case,
    unrecognized_status_is_empty,
);
