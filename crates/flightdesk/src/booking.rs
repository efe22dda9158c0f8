use crate::{
    accessor,
    model::{
        BookingOutcome, CustomerId, FlightNumber, ReservationNumber, ReservationStatus,
        WaitlistPolicy,
    },
    stmt::Statement,
    Db, Error, Executor, Result,
};

/// A validated pair of customer and flight identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub customer: CustomerId,
    pub flight: FlightNumber,
}

impl BookingRequest {
    /// Parses untrusted identifiers. Fails before any query is issued.
    pub fn parse(customer: &str, flight: &str) -> Result<BookingRequest> {
        Ok(BookingRequest {
            customer: customer.parse()?,
            flight: flight.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    ValidatingCustomer,
    ValidatingFlight,
    CheckingCapacity,
    Reserving,
    Waitlisting,
    Done,
    Failed,
}

/// Logs each phase a booking passes through.
struct Progress {
    request: BookingRequest,
    phase: Phase,
}

impl Progress {
    fn new(request: BookingRequest) -> Progress {
        log::debug!(
            "booking customer {} on flight {}: {:?}",
            request.customer,
            request.flight,
            Phase::Start
        );
        Progress {
            request,
            phase: Phase::Start,
        }
    }

    fn enter(&mut self, next: Phase) {
        log::debug!(
            "booking customer {} on flight {}: {:?} -> {:?}",
            self.request.customer,
            self.request.flight,
            self.phase,
            next
        );
        self.phase = next;
    }

    /// Records the outcome of a booking step, entering `Failed` on error.
    fn finish<T>(&mut self, res: Result<T>) -> Result<T> {
        self.enter(if res.is_ok() { Phase::Done } else { Phase::Failed });
        res
    }
}

impl Db {
    /// Books a seat for a customer on a flight.
    ///
    /// Reserves a seat when one is free. When the flight is full the outcome
    /// is declined and nothing is written; see [`Db::waitlist`] and
    /// [`Db::book_or_waitlist`].
    pub async fn book(&self, customer: &str, flight: &str) -> Result<BookingOutcome> {
        self.book_request(BookingRequest::parse(customer, flight)?)
            .await
    }

    pub async fn book_request(&self, request: BookingRequest) -> Result<BookingOutcome> {
        let mut progress = Progress::new(request);

        if let Err(err) = self.validate(&mut progress).await {
            return progress.finish(Err(err));
        }

        progress.enter(Phase::CheckingCapacity);
        let flight = request.flight;

        let res = self
            .transaction(async |tx| {
                let remaining = checked_seats_remaining(tx, flight).await?;

                if remaining == 0 {
                    return Ok(None);
                }

                if !claim_seat(tx, flight).await? {
                    // Another booking took the last seat after the check.
                    return Ok(None);
                }

                let rnum = accessor::allocate_reservation_number(tx).await?;
                insert_reservation(tx, rnum, request, ReservationStatus::Reserved).await?;
                Ok(Some(rnum))
            })
            .await;

        let res = res.map(|rnum| match rnum {
            Some(rnum) => {
                progress.enter(Phase::Reserving);
                BookingOutcome::reserved(rnum)
            }
            None => BookingOutcome::declined(None),
        });

        progress.finish(res)
    }

    /// Adds a customer to a full flight's waitlist without selling a seat.
    ///
    /// Rejected with an invalid-input error when the flight still has seats.
    pub async fn waitlist(&self, customer: &str, flight: &str) -> Result<BookingOutcome> {
        self.waitlist_request(BookingRequest::parse(customer, flight)?)
            .await
    }

    pub async fn waitlist_request(&self, request: BookingRequest) -> Result<BookingOutcome> {
        let mut progress = Progress::new(request);

        if let Err(err) = self.validate(&mut progress).await {
            return progress.finish(Err(err));
        }

        progress.enter(Phase::CheckingCapacity);
        let flight = request.flight;

        let res = self
            .transaction(async |tx| {
                let remaining = checked_seats_remaining(tx, flight).await?;

                if remaining > 0 {
                    return Err(Error::invalid_input(
                        "waitlist request",
                        format!("flight {flight} has {remaining} seats available"),
                    ));
                }

                let rnum = accessor::allocate_reservation_number(tx).await?;
                insert_reservation(tx, rnum, request, ReservationStatus::Waitlisted).await?;
                Ok(rnum)
            })
            .await;

        let res = res.map(|rnum| {
            progress.enter(Phase::Waitlisting);
            BookingOutcome::waitlisted(rnum)
        });

        progress.finish(res)
    }

    /// Books a seat and, when the flight is full, applies `policy`.
    pub async fn book_or_waitlist(
        &self,
        customer: &str,
        flight: &str,
        policy: WaitlistPolicy,
    ) -> Result<BookingOutcome> {
        let request = BookingRequest::parse(customer, flight)?;
        let outcome = self.book_request(request).await?;

        if outcome.is_capacity_exhausted() && policy == WaitlistPolicy::Enroll {
            return self.waitlist_request(request).await;
        }

        Ok(outcome)
    }

    /// Moves a waitlisted reservation to reserved, selling a seat.
    ///
    /// If the flight is still full the reservation stays waitlisted and the
    /// outcome is declined.
    pub async fn confirm_waitlisted(&self, rnum: ReservationNumber) -> Result<BookingOutcome> {
        self.transaction(async |tx| {
            let flight = waitlisted_flight(tx, rnum, ReservationStatus::Reserved).await?;
            let remaining = checked_seats_remaining(tx, flight).await?;

            if remaining == 0 || !claim_seat(tx, flight).await? {
                return Ok(BookingOutcome::declined(Some(rnum)));
            }

            set_status(tx, rnum, ReservationStatus::Reserved).await?;
            log::debug!("reservation {rnum} confirmed on flight {flight}");
            Ok(BookingOutcome::reserved(rnum))
        })
        .await
    }

    /// Cancels a waitlisted reservation.
    pub async fn cancel_waitlisted(&self, rnum: ReservationNumber) -> Result<()> {
        self.transaction(async |tx| {
            waitlisted_flight(tx, rnum, ReservationStatus::Cancelled).await?;
            set_status(tx, rnum, ReservationStatus::Cancelled).await?;
            log::debug!("reservation {rnum} cancelled");
            Ok(())
        })
        .await
    }

    async fn validate(&self, progress: &mut Progress) -> Result<()> {
        let mut db = self.clone();
        let BookingRequest { customer, flight } = progress.request;

        progress.enter(Phase::ValidatingCustomer);
        if !accessor::customer_exists(&mut db, customer).await? {
            return Err(Error::unknown_customer(customer.get()));
        }

        progress.enter(Phase::ValidatingFlight);
        if !accessor::flight_exists(&mut db, flight).await? {
            return Err(Error::unknown_flight(flight.get()));
        }

        Ok(())
    }
}

/// Seats remaining, failing if more seats were sold than the plane holds.
async fn checked_seats_remaining<E: Executor + ?Sized>(
    exec: &mut E,
    flight: FlightNumber,
) -> Result<i64> {
    let remaining = accessor::seats_remaining(exec, flight).await?;

    if remaining < 0 {
        log::error!("flight {flight} has {remaining} seats remaining; refusing to book");
        return Err(Error::invariant_violation(format!(
            "flight {flight} has {remaining} seats remaining"
        )));
    }

    Ok(remaining)
}

/// Sells one seat if the flight is below capacity. Returns `false` when it
/// is already full.
async fn claim_seat<E: Executor + ?Sized>(exec: &mut E, flight: FlightNumber) -> Result<bool> {
    let count = exec
        .execute(
            Statement::new("UPDATE flight SET num_sold = num_sold + 1 WHERE fnum = ")
                .param(flight)
                .sql(
                    " AND num_sold < (SELECT p.seats FROM flightinfo fi \
                     JOIN plane p ON p.id = fi.plane_id WHERE fi.flight_id = ",
                )
                .param(flight)
                .sql(")"),
        )
        .await?;

    Ok(count == 1)
}

async fn insert_reservation<E: Executor + ?Sized>(
    exec: &mut E,
    rnum: ReservationNumber,
    request: BookingRequest,
    status: ReservationStatus,
) -> Result<()> {
    exec.execute(
        Statement::new("INSERT INTO reservation (rnum, cid, fid, status) VALUES (")
            .param(rnum)
            .sql(", ")
            .param(request.customer)
            .sql(", ")
            .param(request.flight)
            .sql(", ")
            .param(status)
            .sql(")"),
    )
    .await?;

    Ok(())
}

/// Flight of a waitlisted reservation, failing if the reservation may not
/// move to `next`.
async fn waitlisted_flight<E: Executor + ?Sized>(
    exec: &mut E,
    rnum: ReservationNumber,
    next: ReservationStatus,
) -> Result<FlightNumber> {
    let (flight, status) = accessor::reservation(exec, rnum).await?;

    if !status.can_transition_to(next) {
        return Err(Error::invalid_input(
            "reservation status",
            format!("reservation {rnum} is {status} and cannot become {next}"),
        ));
    }

    Ok(flight)
}

async fn set_status<E: Executor + ?Sized>(
    exec: &mut E,
    rnum: ReservationNumber,
    status: ReservationStatus,
) -> Result<()> {
    let count = exec
        .execute(
            Statement::new("UPDATE reservation SET status = ")
                .param(status)
                .sql(" WHERE rnum = ")
                .param(rnum)
                .sql(" AND status = ")
                .param(ReservationStatus::Waitlisted),
        )
        .await?;

    if count != 1 {
        return Err(Error::invalid_result(format!(
            "expected to update reservation {rnum}, updated {count} rows"
        )));
    }

    Ok(())
}
