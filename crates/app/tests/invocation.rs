mod support;

use std::sync::Arc;

use betslip_app::{
    AnalysisRequest, Analyzer, AnalyzerError, ApiError, AppError, TokenError,
};
use betslip_core::{AnalysisResult, TransactionFilter, TransactionType};
use serde_json::json;
use support::{balance_of, execute_sql, priced_model, setup_app, setup_app_with};

struct FailingAnalyzer;

impl Analyzer for FailingAnalyzer {
    fn analyze(&self, _request: &AnalysisRequest<'_>) -> Result<AnalysisResult, AnalyzerError> {
        Err(AnalyzerError::Failed("provider timed out".to_string()))
    }
}

#[test]
fn successful_analysis_charges_model_cost() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "NBA Props", 5, true);
    state.services.ledger.grant("user-1", 10).expect("grant");

    let outcome = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({"slip": "LAL ML"}))
        .expect("analyze");
    assert_eq!(outcome.tokens_used, 5);
    assert_eq!(outcome.remaining_tokens, 5);
    assert_eq!(outcome.result.model_name, "NBA Props");
    assert_eq!(balance_of(state, "user-1"), 5);

    let rows = state.services.transactions.for_user("user-1").expect("rows");
    let deductions: Vec<_> = rows
        .iter()
        .filter(|row| row.kind == TransactionType::Deduction)
        .collect();
    assert_eq!(deductions.len(), 1);
    assert_eq!(deductions[0].tokens_deducted, 5);

    let logs = state
        .services
        .analyzer
        .list_logs(Some("user-1"), 10)
        .expect("logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].input_type, "text");
    assert_eq!(logs[0].input_text, r#"{"slip":"LAL ML"}"#);
}

#[test]
fn repeated_requests_charge_each_time() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "NBA Props", 5, true);
    state.services.ledger.grant("user-1", 10).expect("grant");

    for expected in [5, 0] {
        let outcome = state
            .services
            .invocation
            .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!(null))
            .expect("analyze");
        assert_eq!(outcome.remaining_tokens, expected);
    }
    let err = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!(null))
        .unwrap_err();
    assert!(matches!(err, AppError::Token(TokenError::InsufficientBalance)));
}

#[test]
fn low_balance_is_rejected_without_charge() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "NBA Props", 5, true);
    state.services.ledger.grant("user-1", 3).expect("grant");

    let err = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({}))
        .unwrap_err();
    let api = ApiError::from(err);
    assert_eq!(api.status, 402);
    assert_eq!(api.kind.as_deref(), Some("insufficient_tokens"));
    assert_eq!(balance_of(state, "user-1"), 3);
}

#[test]
fn unpriced_model_reports_missing_config() {
    let app = setup_app();
    let state = &app.state;
    let model = state
        .services
        .catalog
        .create_model(&betslip_core::AiModelInput {
            name: "Unpriced".to_string(),
            is_active: true,
            ..Default::default()
        })
        .expect("model");
    state.services.ledger.grant("user-1", 10).expect("grant");

    let err = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({}))
        .unwrap_err();
    let api = ApiError::from(err);
    assert_eq!(api.status, 402);
    assert_eq!(api.error, "Token config missing for this model");
    assert_eq!(balance_of(state, "user-1"), 10);
}

#[test]
fn inactive_model_is_refunded() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "Retired", 5, false);
    state.services.ledger.grant("user-1", 10).expect("grant");

    let err = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({}))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Analyzer(AnalyzerError::ModelUnavailable)
    ));
    assert_eq!(ApiError::from(err).status, 500);
    assert_eq!(balance_of(state, "user-1"), 10);

    let rows = state.services.transactions.for_user("user-1").expect("rows");
    let kinds: Vec<_> = rows.iter().map(|row| row.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionType::Manual,
            TransactionType::Deduction,
            TransactionType::Refund
        ]
    );
    assert_eq!(rows[2].tokens_deducted, -5);
    assert_eq!(rows[2].balance_after, Some(10));
}

#[test]
fn analyzer_failure_is_refunded() {
    let app = setup_app_with(Arc::new(FailingAnalyzer));
    let state = &app.state;
    let model = priced_model(state, "Flaky", 4, true);
    state.services.ledger.grant("user-1", 4).expect("grant");

    let err = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({}))
        .unwrap_err();
    let api = ApiError::from(err);
    assert_eq!(api.status, 500);
    assert_eq!(api.error, "Analysis failed");
    assert_eq!(balance_of(state, "user-1"), 4);

    let summary = state.services.transactions.summary().expect("summary");
    assert_eq!(summary.total_deductions, 4);
    assert_eq!(summary.total_refunds, 4);
    assert!(
        state
            .services
            .analyzer
            .list_logs(None, 10)
            .expect("logs")
            .is_empty()
    );
}

#[test]
fn ledger_stays_consistent_with_balance() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "NBA Props", 3, true);
    let ledger = &state.services.ledger;
    ledger.grant("user-1", 20).expect("grant");
    ledger.set_balance("user-1", 12).expect("set");
    state
        .services
        .invocation
        .deduct_only(Some("user-1"), Some(&model.id))
        .expect("deduct");
    ledger.grant("user-1", 1).expect("grant");

    let rows = state
        .services
        .transactions
        .list(&TransactionFilter::default())
        .expect("rows");
    let sum: i64 = rows.iter().map(|row| row.tokens_deducted).sum();
    assert_eq!(balance_of(state, "user-1"), 10);
    assert_eq!(-sum, 10);
}

#[test]
fn deduct_only_requires_ids() {
    let app = setup_app();
    let err = app
        .state
        .services
        .invocation
        .deduct_only(Some("user-1"), None)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(err.to_string(), "Missing user_id or model_id");
}

#[test]
fn analyzer_log_failure_keeps_the_analysis() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "NBA Props", 5, true);
    state.services.ledger.grant("user-1", 10).expect("grant");
    execute_sql(
        state,
        r#"
        CREATE TRIGGER reject_analyzer_inputs BEFORE INSERT ON analyzer_inputs
        BEGIN
          SELECT RAISE(ABORT, 'analyzer log unavailable');
        END;
        "#,
    );

    let outcome = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({"slip": "BOS -3.5"}))
        .expect("analyze");
    assert_eq!(outcome.tokens_used, 5);
    assert_eq!(outcome.remaining_tokens, 5);
    assert_eq!(balance_of(state, "user-1"), 5);
    assert!(
        state
            .services
            .analyzer
            .list_logs(None, 10)
            .expect("logs")
            .is_empty()
    );
}

#[test]
fn failed_ledger_write_rolls_back_the_charge() {
    let app = setup_app();
    let state = &app.state;
    let model = priced_model(state, "NBA Props", 5, true);
    state.services.ledger.grant("user-1", 5).expect("grant");
    execute_sql(
        state,
        r#"
        CREATE TRIGGER reject_deductions BEFORE INSERT ON token_transactions
        WHEN NEW.type = 'deduction'
        BEGIN
          SELECT RAISE(ABORT, 'ledger unavailable');
        END;
        "#,
    );

    let err = state
        .services
        .invocation
        .analyze_with_tokens(Some("user-1"), Some(&model.id), &json!({}))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Token(TokenError::PersistenceFailure(_))
    ));
    let api = ApiError::from(err);
    assert_eq!(api.status, 500);
    assert_eq!(api.error, "Token deduction failed");

    assert_eq!(balance_of(state, "user-1"), 5);
    let kinds: Vec<_> = state
        .services
        .transactions
        .for_user("user-1")
        .expect("rows")
        .iter()
        .map(|row| row.kind)
        .collect();
    assert_eq!(kinds, vec![TransactionType::Manual]);
}
