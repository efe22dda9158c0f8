use super::Error;

#[derive(Debug)]
pub(super) struct UnknownCustomerError {
    id: i64,
}

impl std::error::Error for UnknownCustomerError {}

impl core::fmt::Display for UnknownCustomerError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown customer: {}", self.id)
    }
}

impl Error {
    /// The referenced customer does not exist.
    pub fn unknown_customer(id: i64) -> Error {
        Error::from(super::ErrorKind::UnknownCustomer(UnknownCustomerError {
            id,
        }))
    }

    pub fn is_unknown_customer(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownCustomer(_))
    }
}
