use crate::{command::describe, theme};
use anyhow::Result;
use flightdesk::{
    accessor,
    model::{
        BookingStatus, CustomerId, FlightInfoId, FlightNumber, NewFlight, Pilot,
        PilotId, Plane, PlaneId, Technician, TechnicianId,
    },
    stmt::RowSet,
    BookingRequest, Db,
};
use std::io::{self, BufRead, Write};

/// The numbered main menu, read from `input` and written to `output`.
pub struct Menu<R, W> {
    db: Db,
    input: R,
    output: W,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    AddPlane,
    AddPilot,
    AddFlight,
    AddTechnician,
    BookFlight,
    AvailableSeats,
    RepairsPerPlane,
    RepairsPerYear,
    PassengersWithStatus,
    Exit,
}

impl Choice {
    const ALL: [(Choice, &'static str); 10] = [
        (Choice::AddPlane, "Add Plane"),
        (Choice::AddPilot, "Add Pilot"),
        (Choice::AddFlight, "Add Flight"),
        (Choice::AddTechnician, "Add Technician"),
        (Choice::BookFlight, "Book Flight"),
        (
            Choice::AvailableSeats,
            "List number of available seats for a given flight.",
        ),
        (
            Choice::RepairsPerPlane,
            "List total number of repairs per plane in descending order",
        ),
        (
            Choice::RepairsPerYear,
            "List total number of repairs per year in ascending order",
        ),
        (
            Choice::PassengersWithStatus,
            "Find total number of passengers with a given status",
        ),
        (Choice::Exit, "< EXIT"),
    ];

    fn parse(src: &str) -> Option<Choice> {
        let n: usize = src.trim().parse().ok()?;
        Choice::ALL.get(n.checked_sub(1)?).map(|(choice, _)| *choice)
    }
}

/// Whether the customer accepted the wait list offer.
enum Answer {
    Yes,
    No,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(db: Db, input: R, output: W) -> Self {
        Self { db, input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Shows the menu until the user exits or input ends.
    ///
    /// A failed action prints `Failed..` with the reason and returns to the
    /// menu. Only I/O errors on the terminal end the loop early.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;

            let Some(line) = self.read_line("Please make your choice: ")? else {
                break;
            };

            let choice = match Choice::parse(&line) {
                Some(Choice::Exit) => break,
                Some(choice) => choice,
                None => {
                    writeln!(self.output, "{}", theme::failure("Your input is invalid!"))?;
                    continue;
                }
            };

            match self.dispatch(choice).await {
                Ok(()) => {}
                Err(err) => match err.downcast_ref::<io::Error>() {
                    Some(io) if io.kind() == io::ErrorKind::UnexpectedEof => break,
                    Some(_) => return Err(err),
                    None => {
                        log::debug!("{choice:?} failed: {err:#}");
                        writeln!(self.output, "{}", theme::failure(format!("Failed.. {err}")))?;
                    }
                },
            }
        }

        write!(self.output, "Disconnecting from database...")?;
        writeln!(self.output, "Done\n\nBye !")?;
        self.output.flush()?;
        Ok(())
    }

    async fn dispatch(&mut self, choice: Choice) -> Result<()> {
        match choice {
            Choice::AddPlane => self.add_plane().await,
            Choice::AddPilot => self.add_pilot().await,
            Choice::AddFlight => self.add_flight().await,
            Choice::AddTechnician => self.add_technician().await,
            Choice::BookFlight => self.book_flight().await,
            Choice::AvailableSeats => self.available_seats().await,
            Choice::RepairsPerPlane => {
                let rows = self.db.repairs_per_plane().await?;
                self.print_rows(&rows)
            }
            Choice::RepairsPerYear => {
                let rows = self.db.repairs_per_year().await?;
                self.print_rows(&rows)
            }
            Choice::PassengersWithStatus => self.passengers_with_status().await,
            Choice::Exit => Ok(()),
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "{}", theme::heading("MAIN MENU"))?;
        writeln!(self.output, "---------")?;
        for (i, (_, label)) in Choice::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {label}", i + 1)?;
        }
        Ok(())
    }

    async fn add_plane(&mut self) -> Result<()> {
        let id: PlaneId = self.expect_line("Enter plane id: ")?.parse()?;
        let make = self.expect_line("make: ")?;
        let model = self.expect_line("model: ")?;
        let age = self.parse_int("age: ", "age")?;
        let seats = self.parse_int("seats: ", "seats")?;

        self.db
            .add_plane(&Plane {
                id,
                make,
                model,
                age,
                seats,
            })
            .await?;
        self.success()
    }

    async fn add_pilot(&mut self) -> Result<()> {
        let id: PilotId = self.expect_line("Enter pilot id: ")?.parse()?;
        let fullname = self.expect_line("fullname: ")?;
        let nationality = self.expect_line("nationality: ")?;

        self.db
            .add_pilot(&Pilot {
                id,
                fullname,
                nationality,
            })
            .await?;
        self.success()
    }

    async fn add_flight(&mut self) -> Result<()> {
        let fnum: FlightNumber = self.expect_line("Enter flight number: ")?.parse()?;
        let info: FlightInfoId = self.expect_line("flight info id: ")?.parse()?;
        let pilot: PilotId = self.expect_line("pilot id: ")?.parse()?;
        let plane: PlaneId = self.expect_line("plane id: ")?.parse()?;

        self.db
            .add_flight(&NewFlight {
                fnum,
                info,
                pilot,
                plane,
            })
            .await?;
        self.success()
    }

    async fn add_technician(&mut self) -> Result<()> {
        let id: TechnicianId = self.expect_line("Enter technician id: ")?.parse()?;
        let full_name = self.expect_line("full name: ")?;

        self.db
            .add_technician(&Technician { id, full_name })
            .await?;
        self.success()
    }

    async fn book_flight(&mut self) -> Result<()> {
        let customer = self.read_customer().await?;
        let flight = self.read_flight().await?;
        let request = BookingRequest { customer, flight };

        let outcome = self.db.book_request(request).await?;

        match outcome.status {
            BookingStatus::Reserved => {
                writeln!(
                    self.output,
                    "Thank you for choosing our airline, we are booking your flight as we speak!"
                )?;
                writeln!(self.output, "{}", theme::success(describe(&outcome)))?;
            }
            BookingStatus::Declined => match self.ask_waitlist()? {
                Answer::Yes => {
                    writeln!(self.output, "Adding you to the Waitlist!")?;
                    let outcome = self.db.waitlist_request(request).await?;
                    writeln!(self.output, "{}", theme::success(describe(&outcome)))?;
                }
                Answer::No => {
                    writeln!(self.output, "Thank you for your interest in our airline!")?;
                }
            },
            BookingStatus::Waitlisted => {
                writeln!(self.output, "{}", describe(&outcome))?;
            }
        }

        Ok(())
    }

    /// Prompts until the input names an existing customer.
    async fn read_customer(&mut self) -> Result<CustomerId> {
        let mut prompt = "Enter a customer ID: ";

        loop {
            let line = self.expect_line(prompt)?;
            prompt = "Sorry, that customer cannot be found. Please enter a valid customer ID: ";

            let Ok(id) = line.parse::<CustomerId>() else {
                continue;
            };

            if accessor::customer_exists(&mut self.db, id).await? {
                return Ok(id);
            }
        }
    }

    /// Prompts until the input names an existing flight.
    async fn read_flight(&mut self) -> Result<FlightNumber> {
        let mut prompt = "Enter a flight number: ";

        loop {
            let line = self.expect_line(prompt)?;
            prompt = "Sorry, that flight cannot be found. Please enter a valid flight number: ";

            let Ok(fnum) = line.parse::<FlightNumber>() else {
                continue;
            };

            if accessor::flight_exists(&mut self.db, fnum).await? {
                return Ok(fnum);
            }
        }
    }

    fn ask_waitlist(&mut self) -> Result<Answer> {
        let mut prompt = "Unfortunately this flight is sold out, would you like to be added to the wait list? (y/n): ";

        loop {
            let line = self.expect_line(prompt)?;

            match line.trim().to_ascii_lowercase().as_str() {
                "y" => return Ok(Answer::Yes),
                "n" => return Ok(Answer::No),
                _ => prompt = "Sorry, response not recognized. Please enter either y or n: ",
            }
        }
    }

    async fn available_seats(&mut self) -> Result<()> {
        let fnum: FlightNumber = self.expect_line("Enter a flight number: ")?.parse()?;
        let rows = self.db.available_seats(fnum).await?;

        writeln!(self.output, "Number of remaining seats: ")?;
        self.print_rows(&rows)
    }

    async fn passengers_with_status(&mut self) -> Result<()> {
        let fnum: FlightNumber = self.expect_line("Enter a flight number: ")?.parse()?;
        let status = self.expect_line("Enter a status(R, W, C): ")?;

        let rows = self.db.passengers_with_status(fnum, &status).await?;
        self.print_rows(&rows)
    }

    fn print_rows(&mut self, rows: &RowSet) -> Result<()> {
        write!(self.output, "{rows}")?;
        Ok(())
    }

    fn success(&mut self) -> Result<()> {
        writeln!(self.output, "{}", theme::success("Success...!"))?;
        Ok(())
    }

    fn parse_int(&mut self, prompt: &str, field: &'static str) -> Result<i64> {
        let line = self.expect_line(prompt)?;
        line.trim()
            .parse()
            .map_err(|_| flightdesk::Error::invalid_input(field, line).into())
    }

    /// Like [`Menu::read_line`], but end of input is an error.
    fn expect_line(&mut self, prompt: &str) -> Result<String> {
        match self.read_line(prompt)? {
            Some(line) => Ok(line),
            None => Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
        }
    }

    /// Prints `prompt` and reads one line without its line ending. `None` at
    /// end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}
