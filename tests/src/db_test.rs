use crate::{
    logging_driver::{DriverOp, LoggingDriver},
    ExecLog, Setup,
};
use flightdesk::{driver::Capability, Db};
use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Barrier, Mutex, Once},
    time::Duration,
};

static LOGGER: Once = Once::new();

/// Owns the runtime a test runs on and the database it talks to.
///
/// Tests use `#[test]` rather than `#[tokio::test]` so cleanup can block
/// before the process exits. Driver operations are always logged.
pub struct DbTest {
    runtime: Arc<tokio::runtime::Runtime>,
    setup: Box<dyn Setup>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl DbTest {
    /// Create a new DbTest with a current-thread runtime.
    pub fn new(setup: Box<dyn Setup>) -> Self {
        LOGGER.call_once(|| {
            let _ = env_logger::builder().is_test(true).try_init();
        });

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        Self {
            runtime: Arc::new(runtime),
            setup,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connects through a logging driver and resets every table.
    pub async fn try_setup_db(&mut self, transaction_timeout: Duration) -> flightdesk::Result<Db> {
        let driver = LoggingDriver::new(self.setup.driver()?);
        self.ops_log = driver.ops_log_handle();

        let db = Db::builder()
            .transaction_timeout(transaction_timeout)
            .build(Box::new(driver))
            .await?;
        db.reset_db().await?;

        Ok(db)
    }

    pub async fn setup_db(&mut self) -> Db {
        self.try_setup_db(Duration::from_secs(5)).await.unwrap()
    }

    /// Opens `count` more handles on the database prepared by
    /// [`setup_db`](Self::setup_db), each on its own thread and runtime, and
    /// runs `f` on all of them at once. Results are in handle order.
    ///
    /// These handles bypass the operations log.
    pub fn on_separate_connections<T, F, Fut>(
        &self,
        count: usize,
        f: F,
    ) -> Vec<flightdesk::Result<T>>
    where
        T: Send,
        F: Fn(usize, Db) -> Fut + Sync,
        Fut: Future<Output = flightdesk::Result<T>>,
    {
        let barrier = Barrier::new(count);

        std::thread::scope(|scope| {
            let threads: Vec<_> = (0..count)
                .map(|index| {
                    let (f, barrier, setup) = (&f, &barrier, &self.setup);

                    scope.spawn(move || {
                        let runtime = tokio::runtime::Builder::new_current_thread()
                            .enable_all()
                            .build()
                            .expect("Failed to create Tokio runtime");

                        runtime.block_on(async move {
                            let db = match setup.driver() {
                                Ok(driver) => Db::builder().build(driver).await,
                                Err(err) => Err(err),
                            };

                            // Release every handle together, even if one failed to connect.
                            barrier.wait();
                            f(index, db?).await
                        })
                    })
                })
                .collect();

            threads
                .into_iter()
                .map(|thread| thread.join().expect("connection thread panicked"))
                .collect()
        })
    }

    /// The driver operations issued so far.
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }

    pub fn capability(&self) -> &'static Capability {
        self.setup.capability()
    }

    /// Run a test function with a mutable reference to self on the managed
    /// runtime.
    pub fn run_test<F>(&mut self, test_fn: F)
    where
        F: for<'a> FnOnce(&'a mut DbTest) -> Pin<Box<dyn Future<Output = ()> + 'a>>,
    {
        let runtime = self.runtime.clone();
        runtime.block_on(test_fn(self));
    }
}

impl Drop for DbTest {
    fn drop(&mut self) {
        if let Err(err) = self.runtime.block_on(self.setup.cleanup()) {
            log::warn!("test cleanup failed: {err}");
        }
    }
}
