use super::Error;

/// Caller-supplied input could not be accepted.
///
/// Raised for identifiers that do not parse as integers, out-of-range
/// values such as a non-positive seat count, and disallowed reservation
/// status transitions.
#[derive(Debug)]
pub(super) struct InvalidInputError {
    field: Box<str>,
    value: Box<str>,
}

impl std::error::Error for InvalidInputError {}

impl core::fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid input for {}: `{}`", self.field, self.value)
    }
}

impl Error {
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidInput(InvalidInputError {
            field: field.into().into(),
            value: value.into().into(),
        }))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::InvalidInput(_))
    }
}
