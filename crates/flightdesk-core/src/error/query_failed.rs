use super::Error;

/// A read query was rejected by the database or the connection dropped
/// while it ran.
#[derive(Debug)]
pub(super) struct QueryFailed {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for QueryFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for QueryFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query failed: {}", self.inner)
    }
}

impl Error {
    pub fn query_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::QueryFailed(QueryFailed {
            inner: Box::new(err),
        }))
    }

    pub fn is_query_failed(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::QueryFailed(_))
    }
}
