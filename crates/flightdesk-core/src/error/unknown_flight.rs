use super::Error;

#[derive(Debug)]
pub(super) struct UnknownFlightError {
    fnum: i64,
}

impl std::error::Error for UnknownFlightError {}

impl core::fmt::Display for UnknownFlightError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown flight: {}", self.fnum)
    }
}

impl Error {
    /// The referenced flight does not exist.
    pub fn unknown_flight(fnum: i64) -> Error {
        Error::from(super::ErrorKind::UnknownFlight(UnknownFlightError { fnum }))
    }

    pub fn is_unknown_flight(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownFlight(_))
    }
}
