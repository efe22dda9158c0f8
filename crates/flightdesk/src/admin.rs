use crate::{
    model::{Customer, NewFlight, Pilot, Plane, Repair, Technician},
    stmt::{Statement, Value},
    Db, Error, Executor, Result,
};

impl Db {
    pub async fn add_plane(&self, plane: &Plane) -> Result<u64> {
        if plane.seats <= 0 {
            return Err(Error::invalid_input("seats", plane.seats.to_string()));
        }

        if plane.age < 0 {
            return Err(Error::invalid_input("age", plane.age.to_string()));
        }

        self.execute(
            Statement::new("INSERT INTO plane (id, make, model, age, seats) VALUES (")
                .param(plane.id)
                .sql(", ")
                .param(&plane.make)
                .sql(", ")
                .param(&plane.model)
                .sql(", ")
                .param(plane.age)
                .sql(", ")
                .param(plane.seats)
                .sql(")"),
        )
        .await
    }

    pub async fn add_pilot(&self, pilot: &Pilot) -> Result<u64> {
        self.execute(
            Statement::new("INSERT INTO pilot (id, fullname, nationality) VALUES (")
                .param(pilot.id)
                .sql(", ")
                .param(&pilot.fullname)
                .sql(", ")
                .param(&pilot.nationality)
                .sql(")"),
        )
        .await
    }

    pub async fn add_technician(&self, technician: &Technician) -> Result<u64> {
        self.execute(
            Statement::new("INSERT INTO technician (id, full_name) VALUES (")
                .param(technician.id)
                .sql(", ")
                .param(&technician.full_name)
                .sql(")"),
        )
        .await
    }

    pub async fn add_customer(&self, customer: &Customer) -> Result<u64> {
        self.execute(
            Statement::new("INSERT INTO customer (id, fname, lname) VALUES (")
                .param(customer.id)
                .sql(", ")
                .param(&customer.fname)
                .sql(", ")
                .param(&customer.lname)
                .sql(")"),
        )
        .await
    }

    /// Records a repair. The date must be `YYYY-MM-DD`.
    pub async fn add_repair(&self, repair: &Repair) -> Result<u64> {
        let date = Value::date(&repair.date)?;

        self.execute(
            Statement::new("INSERT INTO repairs (rid, plane_id, repair_date) VALUES (")
                .param(repair.id)
                .sql(", ")
                .param(repair.plane)
                .sql(", ")
                .param(date)
                .sql(")"),
        )
        .await
    }

    /// Adds a flight with no seats sold and assigns its pilot and plane.
    /// Both rows are written in one transaction.
    pub async fn add_flight(&self, flight: &NewFlight) -> Result<u64> {
        self.transaction(async |tx| {
            let mut count = tx
                .execute(
                    Statement::new("INSERT INTO flight (fnum, num_sold) VALUES (")
                        .param(flight.fnum)
                        .sql(", 0)"),
                )
                .await?;

            count += tx
                .execute(
                    Statement::new(
                        "INSERT INTO flightinfo (fiid, flight_id, pilot_id, plane_id) VALUES (",
                    )
                    .param(flight.info)
                    .sql(", ")
                    .param(flight.fnum)
                    .sql(", ")
                    .param(flight.pilot)
                    .sql(", ")
                    .param(flight.plane)
                    .sql(")"),
                )
                .await?;

            Ok(count)
        })
        .await
    }
}
