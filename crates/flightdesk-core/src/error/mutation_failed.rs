use super::Error;

/// A data-mutating statement failed: constraint violation, malformed SQL,
/// or connectivity loss.
#[derive(Debug)]
pub(super) struct MutationFailed {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for MutationFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for MutationFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "mutation failed: {}", self.inner)
    }
}

impl Error {
    pub fn mutation_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::MutationFailed(MutationFailed {
            inner: Box::new(err),
        }))
    }

    pub fn is_mutation_failed(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::MutationFailed(_))
    }
}
