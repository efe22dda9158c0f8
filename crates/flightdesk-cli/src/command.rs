use crate::{theme, Menu};
use anyhow::Result;
use clap::{Args, Subcommand};
use flightdesk::{
    model::{
        BookingOutcome, BookingStatus, Customer, CustomerId, FlightInfoId, FlightNumber,
        NewFlight, Pilot, PilotId, Plane, PlaneId, Repair, RepairId, ReservationNumber,
        Technician, TechnicianId, WaitlistPolicy,
    },
    stmt::RowSet,
    Db,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu (the default)
    Menu,
    /// Create any missing tables
    Init(InitCommand),
    /// Book a seat for a customer
    Book(BookCommand),
    /// Show the number of seats left on a flight
    Seats(SeatsCommand),
    /// Reporting queries
    #[command(subcommand)]
    Report(ReportCommand),
    /// Confirm or cancel a waitlisted reservation
    #[command(subcommand)]
    Waitlist(WaitlistCommand),
    /// Insert planes, pilots, flights, technicians, customers, and repairs
    #[command(subcommand)]
    Add(AddCommand),
}

impl Command {
    pub async fn run(self, db: &Db) -> Result<()> {
        match self {
            Command::Menu => {
                let stdin = std::io::stdin();
                Menu::new(db.clone(), stdin.lock(), std::io::stdout())
                    .run()
                    .await
            }
            Command::Init(cmd) => cmd.run(db).await,
            Command::Book(cmd) => cmd.run(db).await,
            Command::Seats(cmd) => cmd.run(db).await,
            Command::Report(cmd) => cmd.run(db).await,
            Command::Waitlist(cmd) => cmd.run(db).await,
            Command::Add(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitCommand {
    /// Drop every table first. All data is lost.
    #[arg(long)]
    reset: bool,
}

impl InitCommand {
    async fn run(self, db: &Db) -> Result<()> {
        if self.reset {
            db.reset_db().await?;
        } else {
            db.push_schema().await?;
        }

        println!("{}", theme::success("Success...!"));
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct BookCommand {
    #[arg(long)]
    customer: String,

    #[arg(long)]
    flight: String,

    /// Join the waitlist if the flight is sold out
    #[arg(long)]
    waitlist: bool,
}

impl BookCommand {
    async fn run(self, db: &Db) -> Result<()> {
        let policy = if self.waitlist {
            WaitlistPolicy::Enroll
        } else {
            WaitlistPolicy::Decline
        };

        let outcome = db
            .book_or_waitlist(&self.customer, &self.flight, policy)
            .await?;

        println!("{}", describe(&outcome));

        if outcome.is_capacity_exhausted() {
            println!(
                "{}",
                theme::hint("Rerun with --waitlist to join the wait list.")
            );
        }

        Ok(())
    }
}

/// One-line summary of a booking outcome.
pub(crate) fn describe(outcome: &BookingOutcome) -> String {
    match (outcome.status, outcome.reservation_number) {
        (BookingStatus::Reserved, Some(rnum)) => {
            format!("Success! Your travel arrangements are confirmed (reservation {rnum})")
        }
        (BookingStatus::Waitlisted, Some(rnum)) => {
            format!("Added to the wait list (reservation {rnum})")
        }
        (BookingStatus::Declined, Some(rnum)) => {
            format!("The flight is still sold out; reservation {rnum} remains on the wait list")
        }
        _ => "Unfortunately this flight is sold out".to_string(),
    }
}

#[derive(Args, Debug)]
pub struct SeatsCommand {
    #[arg(long)]
    flight: FlightNumber,
}

impl SeatsCommand {
    async fn run(self, db: &Db) -> Result<()> {
        print_rows(&db.available_seats(self.flight).await?);
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Number of repairs per plane, most repaired first
    RepairsPerPlane,
    /// Number of repairs per year, fewest first
    RepairsPerYear,
    /// Number of passengers on a flight with a status (R, W, C)
    Passengers {
        #[arg(long)]
        flight: FlightNumber,

        #[arg(long)]
        status: String,
    },
}

impl ReportCommand {
    async fn run(self, db: &Db) -> Result<()> {
        let rows = match self {
            ReportCommand::RepairsPerPlane => db.repairs_per_plane().await?,
            ReportCommand::RepairsPerYear => db.repairs_per_year().await?,
            ReportCommand::Passengers { flight, status } => {
                db.passengers_with_status(flight, &status).await?
            }
        };

        print_rows(&rows);
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum WaitlistCommand {
    /// Move a waitlisted reservation to reserved if a seat is free
    Confirm {
        #[arg(long)]
        reservation: ReservationNumber,
    },
    /// Cancel a waitlisted reservation
    Cancel {
        #[arg(long)]
        reservation: ReservationNumber,
    },
}

impl WaitlistCommand {
    async fn run(self, db: &Db) -> Result<()> {
        match self {
            WaitlistCommand::Confirm { reservation } => {
                let outcome = db.confirm_waitlisted(reservation).await?;
                println!("{}", describe(&outcome));
            }
            WaitlistCommand::Cancel { reservation } => {
                db.cancel_waitlisted(reservation).await?;
                println!("{}", theme::success("Success...!"));
            }
        }

        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum AddCommand {
    Plane {
        #[arg(long)]
        id: PlaneId,
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        age: i64,
        #[arg(long)]
        seats: i64,
    },
    Pilot {
        #[arg(long)]
        id: PilotId,
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        nationality: String,
    },
    /// A flight with its pilot and plane assignment
    Flight {
        #[arg(long)]
        fnum: FlightNumber,
        #[arg(long)]
        info: FlightInfoId,
        #[arg(long)]
        pilot: PilotId,
        #[arg(long)]
        plane: PlaneId,
    },
    Technician {
        #[arg(long)]
        id: TechnicianId,
        #[arg(long)]
        full_name: String,
    },
    Customer {
        #[arg(long)]
        id: CustomerId,
        #[arg(long)]
        fname: String,
        #[arg(long)]
        lname: String,
    },
    Repair {
        #[arg(long)]
        id: RepairId,
        #[arg(long)]
        plane: PlaneId,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
}

impl AddCommand {
    async fn run(self, db: &Db) -> Result<()> {
        match self {
            AddCommand::Plane {
                id,
                make,
                model,
                age,
                seats,
            } => {
                db.add_plane(&Plane {
                    id,
                    make,
                    model,
                    age,
                    seats,
                })
                .await?
            }
            AddCommand::Pilot {
                id,
                fullname,
                nationality,
            } => {
                db.add_pilot(&Pilot {
                    id,
                    fullname,
                    nationality,
                })
                .await?
            }
            AddCommand::Flight {
                fnum,
                info,
                pilot,
                plane,
            } => {
                db.add_flight(&NewFlight {
                    fnum,
                    info,
                    pilot,
                    plane,
                })
                .await?
            }
            AddCommand::Technician { id, full_name } => {
                db.add_technician(&Technician { id, full_name }).await?
            }
            AddCommand::Customer { id, fname, lname } => {
                db.add_customer(&Customer { id, fname, lname }).await?
            }
            AddCommand::Repair { id, plane, date } => {
                db.add_repair(&Repair { id, plane, date }).await?
            }
        };

        println!("{}", theme::success("Success...!"));
        Ok(())
    }
}

fn print_rows(rows: &RowSet) {
    print!("{rows}");
    println!("{}", theme::hint(format!("({} rows)", rows.len())));
}
