use std::str::FromStr;

use betslip_core::{
    AdminActivity, AiModel, AnalyzerInputLog, ApiFeed, BetType, LlmProvider, ModelTokenCost,
    RoleAssignment, Sport, TokenBalance, TokenTransaction, TransactionType,
};
use chrono::{SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use serde_json::Value;

use crate::error::Result;

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> std::result::Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn json_column(row: &Row<'_>, idx: usize) -> std::result::Result<Option<Value>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        serde_json::from_str(&text).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
        })
    })
    .transpose()
}

pub(crate) fn row_to_balance(row: &Row<'_>) -> std::result::Result<TokenBalance, rusqlite::Error> {
    Ok(TokenBalance {
        user_id: row.get(0)?,
        balance: row.get(1)?,
        updated_at: row.get(2)?,
    })
}

/// Columns: id, model_id, model name (joined), tokens_required, description,
/// created_at, updated_at.
pub(crate) fn row_to_cost(row: &Row<'_>) -> std::result::Result<ModelTokenCost, rusqlite::Error> {
    Ok(ModelTokenCost {
        id: row.get(0)?,
        model_id: row.get(1)?,
        model_name: row.get(2)?,
        tokens_required: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Columns: id, user_id, model_id, model name (joined), tokens_deducted, type,
/// balance_after, created_at.
pub(crate) fn row_to_transaction(
    row: &Row<'_>,
) -> std::result::Result<TokenTransaction, rusqlite::Error> {
    Ok(TokenTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        model_id: row.get(2)?,
        model_name: row.get(3)?,
        tokens_deducted: row.get(4)?,
        kind: parse_column(row, 5)?,
        balance_after: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub(crate) const MODEL_COLUMNS: &str = "id, name, description, sport_id, betting_type_id, \
     llm_provider_id, prompt_template, settings, is_active, created_at, updated_at";

pub(crate) fn row_to_model(row: &Row<'_>) -> std::result::Result<AiModel, rusqlite::Error> {
    Ok(AiModel {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        sport_id: row.get(3)?,
        betting_type_id: row.get(4)?,
        llm_provider_id: row.get(5)?,
        prompt_template: row.get(6)?,
        settings: json_column(row, 7)?,
        is_active: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub(crate) fn row_to_provider(row: &Row<'_>) -> std::result::Result<LlmProvider, rusqlite::Error> {
    Ok(LlmProvider {
        id: row.get(0)?,
        name: row.get(1)?,
        base_url: row.get(2)?,
        model_name: row.get(3)?,
        api_key: row.get(4)?,
        notes: row.get(5)?,
    })
}

pub(crate) fn row_to_sport(row: &Row<'_>) -> std::result::Result<Sport, rusqlite::Error> {
    Ok(Sport {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        description: row.get(3)?,
        sport_order: row.get(4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn row_to_bet_type(row: &Row<'_>) -> std::result::Result<BetType, rusqlite::Error> {
    Ok(BetType {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Columns: feed columns, then the joined sport name.
pub(crate) fn row_to_feed(row: &Row<'_>) -> std::result::Result<ApiFeed, rusqlite::Error> {
    Ok(ApiFeed {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        api_key: row.get(3)?,
        sport_id: row.get(4)?,
        is_active: row.get(5)?,
        refresh_interval: row.get(6)?,
        last_fetch: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        sport_name: row.get(11)?,
    })
}

pub(crate) fn row_to_activity(row: &Row<'_>) -> std::result::Result<AdminActivity, rusqlite::Error> {
    Ok(AdminActivity {
        id: row.get(0)?,
        user_id: row.get(1)?,
        action: parse_column(row, 2)?,
        entity_type: row.get(3)?,
        entity_id: row.get(4)?,
        old_values: json_column(row, 5)?,
        new_values: json_column(row, 6)?,
        created_at: row.get(7)?,
    })
}

pub(crate) fn row_to_analyzer_input(
    row: &Row<'_>,
) -> std::result::Result<AnalyzerInputLog, rusqlite::Error> {
    Ok(AnalyzerInputLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        model_id: row.get(2)?,
        input_type: row.get(3)?,
        input_text: row.get(4)?,
        response: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub(crate) fn row_to_role_assignment(
    row: &Row<'_>,
) -> std::result::Result<RoleAssignment, rusqlite::Error> {
    Ok(RoleAssignment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        role: parse_column(row, 2)?,
        is_active: row.get(3)?,
        assigned_by: row.get(4)?,
        assigned_at: row.get(5)?,
    })
}

/// Appends one ledger row. Callers run this inside the transaction that
/// changed the balance so the log and the balance commit together.
pub(crate) fn insert_transaction(
    conn: &Connection,
    user_id: &str,
    model_id: Option<&str>,
    tokens_deducted: i64,
    kind: TransactionType,
    balance_after: Option<i64>,
    created_at: &str,
) -> Result<String> {
    let id = new_id();
    conn.execute(
        r#"
        INSERT INTO token_transactions (
          id, user_id, model_id, tokens_deducted, type, balance_after, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            id,
            user_id,
            model_id,
            tokens_deducted,
            kind.as_str(),
            balance_after,
            created_at
        ],
    )?;
    Ok(id)
}
