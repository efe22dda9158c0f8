use super::Error;

/// A lookup that must match a row matched none.
#[derive(Debug)]
pub(super) struct NotFoundError {
    context: Box<str>,
}

impl std::error::Error for NotFoundError {}

impl core::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "record not found: {}", self.context)
    }
}

impl Error {
    pub fn not_found(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NotFound(NotFoundError {
            context: context.into().into(),
        }))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::NotFound(_))
    }
}
