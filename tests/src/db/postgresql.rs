use flightdesk::{
    db::driver_for_url,
    driver::{Capability, Driver},
};

use crate::{isolation::TestIsolation, Setup};

const DEFAULT_URL: &str = "postgresql://localhost:5432/flightdesk_test";

/// Runs each test in its own schema of the database named by
/// `FLIGHTDESK_TEST_POSTGRES_URL`.
pub struct SetupPostgreSQL {
    isolation: TestIsolation,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
        }
    }
}

impl Default for SetupPostgreSQL {
    fn default() -> Self {
        Self::new()
    }
}

fn base_url() -> String {
    std::env::var("FLIGHTDESK_TEST_POSTGRES_URL").unwrap_or_else(|_| DEFAULT_URL.to_string())
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
    fn driver(&self) -> flightdesk::Result<Box<dyn Driver>> {
        let url = base_url();
        let separator = if url.contains('?') { '&' } else { '?' };
        driver_for_url(&format!(
            "{url}{separator}schema={}",
            self.isolation.schema_name()
        ))
    }

    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn cleanup(&self) -> flightdesk::Result<()> {
        drop_schema(&self.isolation)
            .await
            .map_err(|e| flightdesk::err!("PostgreSQL cleanup failed: {}", e))
    }
}

async fn drop_schema(isolation: &TestIsolation) -> Result<(), Box<dyn std::error::Error>> {
    use tokio_postgres::NoTls;

    let (client, connection) = tokio_postgres::connect(&base_url(), NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error during cleanup: {}", e);
        }
    });

    client
        .batch_execute(&format!(
            "DROP SCHEMA IF EXISTS {} CASCADE",
            isolation.schema_name()
        ))
        .await?;

    Ok(())
}
