#![allow(dead_code)]

use std::sync::Arc;

use betslip_app::{Analyzer, AppState};
use betslip_core::{AiModel, AiModelInput, ModelTokenCostInput};
use tempfile::TempDir;

pub struct TestApp {
    _dir: TempDir,
    pub state: AppState,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = AppState::new(dir.path().join("app.sqlite"));
    state.setup_db().expect("setup db");
    TestApp { _dir: dir, state }
}

pub fn setup_app_with(analyzer: Arc<dyn Analyzer>) -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = AppState::with_analyzer(dir.path().join("app.sqlite"), analyzer);
    state.setup_db().expect("setup db");
    TestApp { _dir: dir, state }
}

pub fn priced_model(state: &AppState, name: &str, cost: i64, is_active: bool) -> AiModel {
    let model = state
        .services
        .catalog
        .create_model(&AiModelInput {
            name: name.to_string(),
            is_active,
            ..AiModelInput::default()
        })
        .expect("create model");
    state
        .services
        .costs
        .put(&ModelTokenCostInput {
            model_id: model.id.clone(),
            tokens_required: cost,
            description: None,
        })
        .expect("put cost");
    model
}

pub fn balance_of(state: &AppState, user_id: &str) -> i64 {
    state
        .services
        .ledger
        .balance(user_id)
        .expect("balance")
        .map(|balance| balance.balance)
        .unwrap_or(0)
}

/// Runs raw SQL against the app database, e.g. to install failure triggers.
pub fn execute_sql(state: &AppState, sql: &str) {
    let conn = rusqlite::Connection::open(&state.config.db_path).expect("open conn");
    conn.execute_batch(sql).expect("execute sql");
}
