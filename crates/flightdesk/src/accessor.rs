//! Narrow read-only lookups.
//!
//! Each function takes any [`Executor`], so the same lookup runs directly on
//! a [`Db`](crate::Db) or inside an open [`Transaction`](crate::Transaction).

use crate::{
    model::{CustomerId, FlightNumber, ReservationNumber, ReservationStatus},
    stmt::Statement,
    Error, Executor, Result,
};

pub async fn customer_exists<E: Executor + ?Sized>(exec: &mut E, id: CustomerId) -> Result<bool> {
    let rows = exec
        .query(Statement::new("SELECT 1 FROM customer WHERE id = ").param(id))
        .await?;
    Ok(!rows.is_empty())
}

pub async fn flight_exists<E: Executor + ?Sized>(exec: &mut E, fnum: FlightNumber) -> Result<bool> {
    let rows = exec
        .query(Statement::new("SELECT 1 FROM flight WHERE fnum = ").param(fnum))
        .await?;
    Ok(!rows.is_empty())
}

/// Seats of the assigned plane minus seats sold. Negative only when stored
/// data is inconsistent.
pub async fn seats_remaining<E: Executor + ?Sized>(
    exec: &mut E,
    fnum: FlightNumber,
) -> Result<i64> {
    let rows = exec
        .query(
            Statement::new(
                "SELECT p.seats - f.num_sold FROM flight f \
                 JOIN flightinfo fi ON fi.flight_id = f.fnum \
                 JOIN plane p ON p.id = fi.plane_id \
                 WHERE f.fnum = ",
            )
            .param(fnum),
        )
        .await?;

    if rows.is_empty() {
        return Err(Error::not_found(format!(
            "flight {fnum} or its plane assignment"
        )));
    }

    rows.scalar_i64()
}

pub async fn current_sold<E: Executor + ?Sized>(exec: &mut E, fnum: FlightNumber) -> Result<i64> {
    let rows = exec
        .query(Statement::new("SELECT num_sold FROM flight WHERE fnum = ").param(fnum))
        .await?;

    if rows.is_empty() {
        return Err(Error::not_found(format!("flight {fnum}")));
    }

    rows.scalar_i64()
}

/// The counter's next value. Skips past any reservation stored without going
/// through the counter.
macro_rules! next_rnum {
    () => {
        "CASE \
         WHEN last_rnum >= (SELECT COALESCE(MAX(rnum), 0) FROM reservation) THEN last_rnum + 1 \
         ELSE (SELECT COALESCE(MAX(rnum), 0) FROM reservation) + 1 END"
    };
}

/// The number the next booking will be given. A preview only: another
/// booking may take it first.
pub async fn next_reservation_number<E: Executor + ?Sized>(
    exec: &mut E,
) -> Result<ReservationNumber> {
    let rows = exec
        .query(Statement::new(concat!(
            "SELECT ",
            next_rnum!(),
            " FROM reservation_counter WHERE id = 1"
        )))
        .await?;

    if rows.is_empty() {
        return Err(Error::not_found("reservation counter"));
    }

    rows.scalar_i64().map(ReservationNumber)
}

pub async fn reservation_status<E: Executor + ?Sized>(
    exec: &mut E,
    rnum: ReservationNumber,
) -> Result<ReservationStatus> {
    let (_, status) = reservation(exec, rnum).await?;
    Ok(status)
}

/// Flight and status of a reservation.
pub(crate) async fn reservation<E: Executor + ?Sized>(
    exec: &mut E,
    rnum: ReservationNumber,
) -> Result<(FlightNumber, ReservationStatus)> {
    let rows = exec
        .query(Statement::new("SELECT fid, status FROM reservation WHERE rnum = ").param(rnum))
        .await?;

    let Some(row) = rows.first() else {
        return Err(Error::not_found(format!("reservation {rnum}")));
    };

    let fnum = row
        .get_i64(0)?
        .ok_or_else(|| Error::invalid_result("reservation without a flight"))?;

    let code = row.get(1).unwrap_or_default();
    let status = ReservationStatus::from_code(code).ok_or_else(|| {
        Error::invalid_result(format!("unknown reservation status `{code}`"))
    })?;

    Ok((FlightNumber(fnum), status))
}

/// Takes the next reservation number from the counter. Must run inside the
/// transaction that inserts the reservation, so the number is released if
/// the insert rolls back.
pub(crate) async fn allocate_reservation_number<E: Executor + ?Sized>(
    exec: &mut E,
) -> Result<ReservationNumber> {
    let rows = exec
        .query(Statement::new(concat!(
            "UPDATE reservation_counter SET last_rnum = ",
            next_rnum!(),
            " WHERE id = 1 RETURNING last_rnum"
        )))
        .await?;

    if rows.is_empty() {
        return Err(Error::not_found("reservation counter"));
    }

    rows.scalar_i64().map(ReservationNumber)
}
