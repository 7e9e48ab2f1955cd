use betslip_core::{ApiFeed, ApiFeedInput};
use betslip_db::Db;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, not_found, open_db, require_id};

/// Admin CRUD over external data feeds. Feed API keys leave this service masked.
#[derive(Clone)]
pub struct FeedsService {
    config: SharedConfig,
}

impl FeedsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn list(&self) -> Result<Vec<ApiFeed>> {
        let db = self.db()?;
        Ok(db.list_feeds()?.iter().map(ApiFeed::masked).collect())
    }

    pub fn create(&self, input: &ApiFeedInput) -> Result<ApiFeed> {
        let input = normalize_feed(input)?;
        if input.api_key.is_none() {
            return Err(AppError::InvalidInput("api_key is required".to_string()));
        }
        let db = self.db()?;
        validate_sport(&db, &input)?;
        let feed = db.create_feed(&input)?;
        tracing::info!(feed_id = %feed.id, name = %feed.name, "feed created");
        Ok(feed.masked())
    }

    /// A blank or absent `api_key` keeps the stored key.
    pub fn update(&self, id: &str, input: &ApiFeedInput) -> Result<ApiFeed> {
        let input = normalize_feed(input)?;
        let db = self.db()?;
        validate_sport(&db, &input)?;
        let feed = db
            .update_feed(id, &input)?
            .ok_or_else(|| not_found("feed", id))?;
        Ok(feed.masked())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let db = self.db()?;
        if !db.delete_feed(id)? {
            return Err(not_found("feed", id));
        }
        tracing::info!(feed_id = id, "feed deleted");
        Ok(())
    }
}

fn normalize_feed(input: &ApiFeedInput) -> Result<ApiFeedInput> {
    let name = require_id(&input.name, "name")?;
    let url = require_id(&input.url, "url")?;
    if input.refresh_interval <= 0 {
        return Err(AppError::InvalidInput(
            "refresh_interval must be greater than zero".to_string(),
        ));
    }
    Ok(ApiFeedInput {
        name: name.to_string(),
        url: url.to_string(),
        api_key: input
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string),
        sport_id: input
            .sport_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        ..input.clone()
    })
}

fn validate_sport(db: &Db, input: &ApiFeedInput) -> Result<()> {
    if let Some(sport_id) = input.sport_id.as_deref() {
        if db.get_sport(sport_id)?.is_none() {
            return Err(AppError::InvalidInput(format!(
                "sport_id {} does not exist",
                sport_id
            )));
        }
    }
    Ok(())
}
