use std::path::PathBuf;
use std::sync::Arc;

use crate::analyzer::{Analyzer, StubAnalyzer};
use crate::error::{AppError, Result};
use crate::services::AppServices;
use betslip_db::Db;

/// Paths needed to run the analyzer backend.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
}

/// Application state shared by the HTTP server and tests.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self::with_analyzer(db_path, Arc::new(StubAnalyzer))
    }

    pub fn with_analyzer(db_path: PathBuf, analyzer: Arc<dyn Analyzer>) -> Self {
        let config = AppConfig { db_path };
        let services = AppServices::new(&config, analyzer);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    /// Migrates the database and, when configured, makes sure a super admin exists.
    pub fn initialize(&self, bootstrap_super_admin: Option<&str>) -> Result<()> {
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))?;
        if let Some(user_id) = bootstrap_super_admin {
            self.services.roles.bootstrap_super_admin(user_id)?;
        }
        Ok(())
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
