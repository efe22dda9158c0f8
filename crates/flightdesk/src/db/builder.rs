use super::{Db, Shared, Slot};
use crate::Result;

use flightdesk_core::driver::Driver;
use tokio::sync::Mutex;

use std::{sync::Arc, time::Duration};

#[derive(Debug)]
pub struct Builder {
    transaction_timeout: Duration,
    push_schema_on_connect: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_secs(5),
            push_schema_on_connect: false,
        }
    }
}

impl Builder {
    /// How long a transaction may run before it is rolled back.
    pub fn transaction_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.transaction_timeout = timeout;
        self
    }

    /// Create missing tables as soon as the connection is open.
    pub fn push_schema_on_connect(&mut self, push: bool) -> &mut Self {
        self.push_schema_on_connect = push;
        self
    }

    pub async fn connect(&self, url: &str) -> Result<Db> {
        self.build(super::driver_for_url(url)?).await
    }

    pub async fn build(&self, driver: Box<dyn Driver>) -> Result<Db> {
        let connection = driver.connect().await?;

        log::debug!("connected to {}", driver.url());

        let db = Db {
            shared: Arc::new(Shared {
                driver,
                connection: Mutex::new(Slot::new(connection)),
                transaction_timeout: self.transaction_timeout,
            }),
        };

        if self.push_schema_on_connect {
            db.push_schema().await?;
        }

        Ok(db)
    }
}
