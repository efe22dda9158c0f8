use super::Error;

/// Stored data contradicts an invariant the system maintains, for example a
/// flight with more seats sold than its plane holds.
#[derive(Debug)]
pub(super) struct InvariantViolation {
    message: Box<str>,
}

impl std::error::Error for InvariantViolation {}

impl core::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invariant violation: {}", self.message)
    }
}

impl Error {
    pub fn invariant_violation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvariantViolation(InvariantViolation {
            message: message.into().into(),
        }))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::InvariantViolation(_))
    }
}
