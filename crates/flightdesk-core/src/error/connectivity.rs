use super::Error;

/// The database could not be reached, or the connection was lost.
#[derive(Debug)]
pub(super) struct ConnectivityError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ConnectivityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("unable to connect to database: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates a connectivity error from a driver error.
    pub fn connectivity(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Connectivity(ConnectivityError {
            inner: Box::new(err),
        }))
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::Connectivity(_))
    }
}
