mod db_test;
pub mod fixture;
mod isolation;

pub use db_test::DbTest;
pub use exec_log::ExecLog;
pub use logging_driver::{DriverOp, LoggingDriver};

use flightdesk::driver::{Capability, Driver};

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// A fresh driver for the database under test.
    fn driver(&self) -> flightdesk::Result<Box<dyn Driver>>;

    fn capability(&self) -> &'static Capability;

    /// Drops whatever this setup instance created.
    ///
    /// Only the tables belonging to this test are touched, so tests sharing
    /// one database server can run in parallel.
    async fn cleanup(&self) -> flightdesk::Result<()> {
        Ok(())
    }
}

/// Generates one `#[test]` per enabled backend for each listed async test
/// function. Each function takes `&mut DbTest`.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+
    ) => {
        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new(Box::new(
                        $crate::db::sqlite::SetupSqlite::new()
                    ));

                    test.run_test(|t| Box::pin(super::$f(t)));
                }
            )*
        }

        #[cfg(feature = "postgresql")]
        mod postgresql {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new(Box::new(
                        $crate::db::postgresql::SetupPostgreSQL::new()
                    ));

                    test.run_test(|t| Box::pin(super::$f(t)));
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident,
        )+
    ) => {
        $crate::tests!( $(
            $( #[$attrs] )*
            $f
        ),+ );
    }
}
