use crate::{
    model::{FlightNumber, ReservationStatus},
    stmt::{RowSet, Statement},
    Db, Result,
};

impl Db {
    /// Seats still free on a flight, as a single `seats_remaining` column.
    /// Empty when the flight or its plane assignment does not exist.
    pub async fn available_seats(&self, fnum: FlightNumber) -> Result<RowSet> {
        self.query(
            Statement::new(
                "SELECT p.seats - f.num_sold AS seats_remaining FROM flight f \
                 JOIN flightinfo fi ON fi.flight_id = f.fnum \
                 JOIN plane p ON p.id = fi.plane_id \
                 WHERE f.fnum = ",
            )
            .param(fnum),
        )
        .await
    }

    /// Repair count per plane, most repaired first.
    pub async fn repairs_per_plane(&self) -> Result<RowSet> {
        self.query(Statement::new(
            "SELECT COUNT(*) AS \"# Repairs\", plane_id AS \"Plane ID#\" FROM repairs \
             GROUP BY plane_id ORDER BY 1 DESC, 2 ASC",
        ))
        .await
    }

    /// Repair count per calendar year, fewest first.
    pub async fn repairs_per_year(&self) -> Result<RowSet> {
        self.query(
            Statement::new("SELECT COUNT(*) AS \"# Repairs\", ")
                .year_of("repair_date")
                .sql(" AS \"Year\" FROM repairs GROUP BY 2 ORDER BY 1 ASC, 2 ASC"),
        )
        .await
    }

    /// Number of reservations on a flight with the given status.
    ///
    /// The status is matched case-insensitively against `R`, `W`, and `C`.
    /// Any other status yields the column with no rows.
    pub async fn passengers_with_status(&self, fnum: FlightNumber, status: &str) -> Result<RowSet> {
        const COLUMN: &str = "# Customers with Status";

        let Some(status) = ReservationStatus::from_code(status) else {
            log::debug!("no reservations can have status `{}`", status.trim());
            return Ok(RowSet::empty(vec![COLUMN.to_string()]));
        };

        self.query(
            Statement::new("SELECT COUNT(*) AS \"# Customers with Status\" FROM reservation WHERE fid = ")
                .param(fnum)
                .sql(" AND status = ")
                .param(status),
        )
        .await
    }
}
