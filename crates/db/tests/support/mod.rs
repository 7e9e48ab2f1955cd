#![allow(dead_code)]

use std::path::PathBuf;

use betslip_core::{AiModel, AiModelInput, ModelTokenCostInput};
use betslip_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn model_input(name: &str) -> AiModelInput {
    AiModelInput {
        name: name.to_string(),
        is_active: true,
        ..AiModelInput::default()
    }
}

pub fn create_model(db: &Db, name: &str) -> AiModel {
    db.create_model(&model_input(name)).expect("create model")
}

pub fn create_priced_model(db: &Db, name: &str, cost: i64) -> AiModel {
    let model = create_model(db, name);
    db.upsert_token_cost(&ModelTokenCostInput {
        model_id: model.id.clone(),
        tokens_required: cost,
        description: None,
    })
    .expect("set cost");
    model
}

pub fn balance_of(db: &Db, user_id: &str) -> Option<i64> {
    db.get_balance(user_id)
        .expect("load balance")
        .map(|row| row.balance)
}
