use flightdesk::{
    db::driver_for_url,
    driver::{Capability, Driver},
};
use std::path::PathBuf;

use crate::{isolation::TestIsolation, Setup};

/// Every test gets its own database file in the temp directory, so several
/// handles can open the same database.
pub struct SetupSqlite {
    path: PathBuf,
}

impl SetupSqlite {
    pub fn new() -> Self {
        let name = format!("flightdesk-{}.db", TestIsolation::new().schema_name());
        Self {
            path: std::env::temp_dir().join(name),
        }
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    fn driver(&self) -> flightdesk::Result<Box<dyn Driver>> {
        driver_for_url(&format!("sqlite:{}", self.path.display()))
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn cleanup(&self) -> flightdesk::Result<()> {
        let journal = self.path.with_extension("db-journal");

        for path in [&self.path, &journal] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(flightdesk::err!(
                        "SQLite cleanup failed for {}: {}",
                        path.display(),
                        err
                    ))
                }
            }
        }

        Ok(())
    }
}
