//! Seed data shared by the integration tests.

use flightdesk::{
    accessor,
    model::{
        Customer, CustomerId, FlightInfoId, FlightNumber, NewFlight, Pilot, PilotId, Plane,
        PlaneId,
    },
    stmt::Statement,
    Db,
};

/// Adds flight `fnum` on its own plane with `seats` seats and marks `sold`
/// of them as sold. The plane, pilot, and flight info share the flight's
/// number as their id.
pub async fn flight(db: &Db, fnum: i64, seats: i64, sold: i64) {
    db.add_plane(&Plane {
        id: PlaneId(fnum),
        make: "Airbus".into(),
        model: "A320".into(),
        age: 3,
        seats,
    })
    .await
    .unwrap();

    db.add_pilot(&Pilot {
        id: PilotId(fnum),
        fullname: format!("Pilot {fnum}"),
        nationality: "FR".into(),
    })
    .await
    .unwrap();

    db.add_flight(&NewFlight {
        fnum: FlightNumber(fnum),
        info: FlightInfoId(fnum),
        pilot: PilotId(fnum),
        plane: PlaneId(fnum),
    })
    .await
    .unwrap();

    if sold != 0 {
        set_sold(db, fnum, sold).await;
    }
}

/// Overwrites `num_sold` without creating reservations.
pub async fn set_sold(db: &Db, fnum: i64, sold: i64) {
    let count = db
        .execute(
            Statement::new("UPDATE flight SET num_sold = ")
                .param(sold)
                .sql(" WHERE fnum = ")
                .param(fnum),
        )
        .await
        .unwrap();
    assert_eq!(count, 1);
}

pub async fn customer(db: &Db, id: i64) {
    db.add_customer(&Customer {
        id: CustomerId(id),
        fname: format!("First{id}"),
        lname: format!("Last{id}"),
    })
    .await
    .unwrap();
}

pub async fn customers(db: &Db, ids: impl IntoIterator<Item = i64>) {
    for id in ids {
        customer(db, id).await;
    }
}

pub async fn num_sold(db: &Db, fnum: i64) -> i64 {
    accessor::current_sold(&mut db.clone(), FlightNumber(fnum))
        .await
        .unwrap()
}

/// `(rnum, cid, status)` of every reservation on a flight, by number.
pub async fn reservations(db: &Db, fnum: i64) -> Vec<(i64, i64, String)> {
    let rows = db
        .query(
            Statement::new("SELECT rnum, cid, status FROM reservation WHERE fid = ")
                .param(fnum)
                .sql(" ORDER BY rnum"),
        )
        .await
        .unwrap();

    rows.iter()
        .map(|row| {
            (
                row.get_i64(0).unwrap().unwrap(),
                row.get_i64(1).unwrap().unwrap(),
                row.get(2).unwrap().trim().to_string(),
            )
        })
        .collect()
}
