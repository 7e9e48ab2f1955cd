use betslip_app::{
    ApiError, AppError, DEFAULT_TRANSACTION_LIMIT, Result, TokenError, require_permission,
};
use betslip_core::{
    ActivityAction, AdminActivity, AdminRole, AiModel, AiModelInput, AnalyzerInputLog, ApiFeed,
    BetType, LlmProvider, LlmProviderInput, ModelTokenCost, ModelTokenCostInput, Permission,
    RoleAssignment, Sport, TokenBalance, TokenTransaction, TransactionFilter, TransactionSummary,
    TransactionType,
};
use serde_json::json;

use crate::{
    ActivityLogsRequest, AnalyzeRequest, AnalyzeResponse, AnalyzerLogsRequest, AppContext,
    BalanceDeletedResponse, BalanceGrantRequest, BalanceSetRequest, BetTypeCreateRequest,
    BetTypeUpdateRequest, DeductRequest, DeductResponse, FeedCreateRequest, FeedUpdateRequest,
    IdRequest, ModelUpdateRequest, ModelsListRequest, OkResponse, ProviderUpdateRequest,
    RoleAssignRequest, RoleMeResponse, RolesListRequest, SportCreateRequest, SportUpdateRequest,
    TransactionsListRequest, UserRequest,
};

const DEFAULT_LOG_LIMIT: u32 = 100;

pub fn analyze_with_tokens(ctx: &AppContext, req: AnalyzeRequest) -> Result<AnalyzeResponse> {
    let outcome = ctx.app_state.services.invocation.analyze_with_tokens(
        req.user_id.as_deref(),
        req.model_id.as_deref(),
        &req.input_data,
    )?;
    Ok(AnalyzeResponse {
        success: true,
        result: outcome.result,
        tokens_used: outcome.tokens_used,
        remaining_tokens: outcome.remaining_tokens,
    })
}

/// Standalone deduction. Every rejection is a 400 with a plain `{error}` body.
pub fn deduct_tokens(
    ctx: &AppContext,
    req: DeductRequest,
) -> std::result::Result<DeductResponse, ApiError> {
    let deduction = ctx
        .app_state
        .services
        .invocation
        .deduct_only(req.user_id.as_deref(), req.model_id.as_deref())
        .map_err(deduct_error)?;
    Ok(DeductResponse {
        success: true,
        tokens_deducted: deduction.tokens_deducted,
        remaining_balance: deduction.remaining_balance,
    })
}

fn deduct_error(err: AppError) -> ApiError {
    match err {
        AppError::Token(TokenError::InsufficientBalance) => {
            ApiError::new(400, "Insufficient tokens", None)
        }
        AppError::Token(_) | AppError::InvalidInput(_) => ApiError::new(400, err.to_string(), None),
        other => ApiError::from(other),
    }
}

pub fn roles_me(caller: &RoleAssignment) -> RoleMeResponse {
    RoleMeResponse {
        assignment: caller.clone(),
        display_name: caller.role.display_name(),
        permissions: caller.role.permissions(),
    }
}

pub fn roles_list(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: RolesListRequest,
) -> Result<Vec<RoleAssignment>> {
    require_permission(caller, Permission::ManageAdmins)?;
    ctx.app_state.services.roles.list(req.include_inactive)
}

pub fn roles_assign(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: RoleAssignRequest,
) -> Result<RoleAssignment> {
    let role = req
        .role
        .parse::<AdminRole>()
        .map_err(|err| AppError::InvalidInput(format!("role: {}", err)))?;
    ctx.app_state.services.roles.assign(caller, &req.user_id, role)
}

pub fn roles_revoke(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: IdRequest,
) -> Result<RoleAssignment> {
    ctx.app_state.services.roles.revoke(caller, &req.id)
}

pub fn balances_list(ctx: &AppContext, caller: &RoleAssignment) -> Result<Vec<TokenBalance>> {
    require_permission(caller, Permission::ManageTokens)?;
    ctx.app_state.services.ledger.list_balances()
}

pub fn balances_set(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: BalanceSetRequest,
) -> Result<TokenBalance> {
    require_permission(caller, Permission::ManageTokens)?;
    let services = &ctx.app_state.services;
    let previous = services.ledger.balance(&req.user_id)?;
    let balance = services.ledger.set_balance(&req.user_id, req.balance)?;
    services.activity.record(
        caller,
        ActivityAction::BalanceSet,
        &balance.user_id,
        previous.map(|row| json!({"balance": row.balance})),
        Some(json!({"balance": balance.balance})),
    );
    Ok(balance)
}

pub fn balances_grant(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: BalanceGrantRequest,
) -> Result<TokenBalance> {
    require_permission(caller, Permission::ManageTokens)?;
    let services = &ctx.app_state.services;
    let balance = services.ledger.grant(&req.user_id, req.amount)?;
    services.activity.record(
        caller,
        ActivityAction::BalanceGranted,
        &balance.user_id,
        None,
        Some(json!({"amount": req.amount, "balance": balance.balance})),
    );
    Ok(balance)
}

pub fn balances_delete(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: UserRequest,
) -> Result<BalanceDeletedResponse> {
    require_permission(caller, Permission::ManageTokens)?;
    let services = &ctx.app_state.services;
    let previous_balance = services.ledger.delete_balance(&req.user_id)?;
    services.activity.record(
        caller,
        ActivityAction::BalanceDeleted,
        &req.user_id,
        Some(json!({"balance": previous_balance})),
        None,
    );
    Ok(BalanceDeletedResponse {
        user_id: req.user_id,
        previous_balance,
    })
}

pub fn costs_list(ctx: &AppContext, caller: &RoleAssignment) -> Result<Vec<ModelTokenCost>> {
    require_permission(caller, Permission::ManageTokens)?;
    ctx.app_state.services.costs.list()
}

pub fn costs_put(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: ModelTokenCostInput,
) -> Result<ModelTokenCost> {
    require_permission(caller, Permission::ManageTokens)?;
    let services = &ctx.app_state.services;
    let cost = services.costs.put(&req)?;
    services.activity.record(
        caller,
        ActivityAction::CostSaved,
        &cost.id,
        None,
        Some(json!({"model_id": cost.model_id, "tokens_required": cost.tokens_required})),
    );
    Ok(cost)
}

pub fn costs_delete(ctx: &AppContext, caller: &RoleAssignment, req: IdRequest) -> Result<OkResponse> {
    require_permission(caller, Permission::ManageTokens)?;
    let services = &ctx.app_state.services;
    services.costs.delete(&req.id)?;
    services
        .activity
        .record(caller, ActivityAction::CostDeleted, &req.id, None, None);
    Ok(OkResponse::ok())
}

pub fn models_list(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: ModelsListRequest,
) -> Result<Vec<AiModel>> {
    require_permission(caller, Permission::ManageModels)?;
    ctx.app_state.services.catalog.list_models(req.active_only)
}

pub fn models_create(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: AiModelInput,
) -> Result<AiModel> {
    require_permission(caller, Permission::ManageModels)?;
    let services = &ctx.app_state.services;
    let model = services.catalog.create_model(&req)?;
    services.activity.record(
        caller,
        ActivityAction::ModelCreated,
        &model.id,
        None,
        Some(model_values(&model)),
    );
    Ok(model)
}

pub fn models_update(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: ModelUpdateRequest,
) -> Result<AiModel> {
    require_permission(caller, Permission::ManageModels)?;
    let services = &ctx.app_state.services;
    let model = services.catalog.update_model(&req.id, &req.model)?;
    services.activity.record(
        caller,
        ActivityAction::ModelUpdated,
        &model.id,
        None,
        Some(model_values(&model)),
    );
    Ok(model)
}

pub fn models_delete(ctx: &AppContext, caller: &RoleAssignment, req: IdRequest) -> Result<OkResponse> {
    require_permission(caller, Permission::ManageModels)?;
    let services = &ctx.app_state.services;
    services.catalog.delete_model(&req.id)?;
    services
        .activity
        .record(caller, ActivityAction::ModelDeleted, &req.id, None, None);
    Ok(OkResponse::ok())
}

pub fn providers_list(ctx: &AppContext, caller: &RoleAssignment) -> Result<Vec<LlmProvider>> {
    require_permission(caller, Permission::ManageModels)?;
    ctx.app_state.services.catalog.list_providers()
}

pub fn providers_create(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: LlmProviderInput,
) -> Result<LlmProvider> {
    require_permission(caller, Permission::ManageModels)?;
    ctx.app_state.services.catalog.create_provider(&req)
}

pub fn providers_update(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: ProviderUpdateRequest,
) -> Result<LlmProvider> {
    require_permission(caller, Permission::ManageModels)?;
    ctx.app_state
        .services
        .catalog
        .update_provider(&req.id, &req.provider)
}

pub fn providers_delete(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: IdRequest,
) -> Result<OkResponse> {
    require_permission(caller, Permission::ManageModels)?;
    ctx.app_state.services.catalog.delete_provider(&req.id)?;
    Ok(OkResponse::ok())
}

pub fn sports_list(ctx: &AppContext, caller: &RoleAssignment) -> Result<Vec<Sport>> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.catalog.list_sports()
}

pub fn sports_create(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: SportCreateRequest,
) -> Result<Sport> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.catalog.create_sport(&req)
}

pub fn sports_update(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: SportUpdateRequest,
) -> Result<Sport> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state
        .services
        .catalog
        .update_sport(&req.id, &req.sport)
}

pub fn sports_delete(ctx: &AppContext, caller: &RoleAssignment, req: IdRequest) -> Result<OkResponse> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.catalog.delete_sport(&req.id)?;
    Ok(OkResponse::ok())
}

pub fn bet_types_list(ctx: &AppContext, caller: &RoleAssignment) -> Result<Vec<BetType>> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.catalog.list_bet_types()
}

pub fn bet_types_create(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: BetTypeCreateRequest,
) -> Result<BetType> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.catalog.create_bet_type(&req.name)
}

pub fn bet_types_update(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: BetTypeUpdateRequest,
) -> Result<BetType> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state
        .services
        .catalog
        .update_bet_type(&req.id, &req.name)
}

pub fn bet_types_delete(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: IdRequest,
) -> Result<OkResponse> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.catalog.delete_bet_type(&req.id)?;
    Ok(OkResponse::ok())
}

pub fn feeds_list(ctx: &AppContext, caller: &RoleAssignment) -> Result<Vec<ApiFeed>> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.feeds.list()
}

pub fn feeds_create(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: FeedCreateRequest,
) -> Result<ApiFeed> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.feeds.create(&req)
}

pub fn feeds_update(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: FeedUpdateRequest,
) -> Result<ApiFeed> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.feeds.update(&req.id, &req.feed)
}

pub fn feeds_delete(ctx: &AppContext, caller: &RoleAssignment, req: IdRequest) -> Result<OkResponse> {
    require_permission(caller, Permission::ManageTaxonomy)?;
    ctx.app_state.services.feeds.delete(&req.id)?;
    Ok(OkResponse::ok())
}

pub fn transactions_list(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: TransactionsListRequest,
) -> Result<Vec<TokenTransaction>> {
    require_permission(caller, Permission::ViewTransactions)?;
    let kind = match req.kind.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(value) => Some(
            value
                .parse::<TransactionType>()
                .map_err(|err| AppError::InvalidInput(format!("type: {}", err)))?,
        ),
    };
    ctx.app_state.services.transactions.list(&TransactionFilter {
        kind,
        search: req.search,
        limit: req.limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT),
    })
}

pub fn transactions_summary(
    ctx: &AppContext,
    caller: &RoleAssignment,
) -> Result<TransactionSummary> {
    require_permission(caller, Permission::ViewTransactions)?;
    ctx.app_state.services.transactions.summary()
}

pub fn analyzer_logs_list(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: AnalyzerLogsRequest,
) -> Result<Vec<AnalyzerInputLog>> {
    require_permission(caller, Permission::ViewTransactions)?;
    ctx.app_state
        .services
        .analyzer
        .list_logs(req.user_id.as_deref(), req.limit.unwrap_or(DEFAULT_LOG_LIMIT))
}

pub fn activity_logs_list(
    ctx: &AppContext,
    caller: &RoleAssignment,
    req: ActivityLogsRequest,
) -> Result<Vec<AdminActivity>> {
    require_permission(caller, Permission::ManageAdmins)?;
    ctx.app_state.services.activity.list(req.limit)
}

fn model_values(model: &AiModel) -> serde_json::Value {
    json!({"name": model.name, "is_active": model.is_active})
}

#[cfg(test)]
mod tests {
    use super::*;
    use betslip_app::AppState;

    fn context(dir: &tempfile::TempDir) -> AppContext {
        let app_state = AppState::new(dir.path().join("app.sqlite"));
        app_state.setup_db().expect("setup db");
        AppContext { app_state }
    }

    fn caller(role: AdminRole) -> RoleAssignment {
        RoleAssignment {
            id: "a1".to_string(),
            user_id: "caller".to_string(),
            role,
            is_active: true,
            assigned_by: None,
            assigned_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn deduct_rejections_are_bad_requests() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);
        let services = &ctx.app_state.services;
        let model = services
            .catalog
            .create_model(&AiModelInput {
                name: "Parlay".to_string(),
                is_active: true,
                ..Default::default()
            })
            .expect("model");

        let err = deduct_tokens(
            &ctx,
            DeductRequest {
                user_id: Some("u1".to_string()),
                model_id: Some(model.id.clone()),
            },
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(err.error, "Token config missing for this model");

        services
            .costs
            .put(&ModelTokenCostInput {
                model_id: model.id.clone(),
                tokens_required: 2,
                description: None,
            })
            .expect("cost");
        let err = deduct_tokens(
            &ctx,
            DeductRequest {
                user_id: Some("u1".to_string()),
                model_id: Some(model.id.clone()),
            },
        )
        .unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(err.error, "Insufficient tokens");
        assert!(err.kind.is_none());

        services.ledger.grant("u1", 3).expect("grant");
        let ok = deduct_tokens(
            &ctx,
            DeductRequest {
                user_id: Some("u1".to_string()),
                model_id: Some(model.id),
            },
        )
        .expect("deduct");
        assert_eq!(ok.tokens_deducted, 2);
        assert_eq!(ok.remaining_balance, 1);
    }

    #[test]
    fn content_creator_cannot_manage_tokens() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);
        let creator = caller(AdminRole::ContentCreator);
        assert!(matches!(
            balances_list(&ctx, &creator),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            transactions_summary(&ctx, &creator),
            Err(AppError::Forbidden(_))
        ));
        assert!(sports_list(&ctx, &creator).expect("sports").is_empty());
        assert!(feeds_list(&ctx, &creator).expect("feeds").is_empty());
        assert!(matches!(
            activity_logs_list(&ctx, &creator, ActivityLogsRequest::default()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_edits_are_recorded_in_activity() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);
        let admin = caller(AdminRole::Admin);
        let model = models_create(
            &ctx,
            &admin,
            AiModelInput {
                name: "Props".to_string(),
                is_active: true,
                ..Default::default()
            },
        )
        .expect("model");
        costs_put(
            &ctx,
            &admin,
            ModelTokenCostInput {
                model_id: model.id.clone(),
                tokens_required: 4,
                description: None,
            },
        )
        .expect("cost");
        balances_grant(
            &ctx,
            &admin,
            BalanceGrantRequest {
                user_id: "u1".to_string(),
                amount: 10,
            },
        )
        .expect("grant");
        balances_set(
            &ctx,
            &admin,
            BalanceSetRequest {
                user_id: "u1".to_string(),
                balance: 3,
            },
        )
        .expect("set");

        let activity =
            activity_logs_list(&ctx, &admin, ActivityLogsRequest::default()).expect("activity");
        let actions: Vec<ActivityAction> = activity.iter().map(|row| row.action).collect();
        assert_eq!(
            actions,
            vec![
                ActivityAction::BalanceSet,
                ActivityAction::BalanceGranted,
                ActivityAction::CostSaved,
                ActivityAction::ModelCreated,
            ]
        );
        let set = &activity[0];
        assert_eq!(set.user_id.as_deref(), Some("caller"));
        assert_eq!(set.entity_id.as_deref(), Some("u1"));
        assert_eq!(set.old_values, Some(json!({"balance": 10})));
        assert_eq!(set.new_values, Some(json!({"balance": 3})));
    }

    #[test]
    fn unknown_transaction_type_is_invalid() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);
        let admin = caller(AdminRole::Admin);
        let err = transactions_list(
            &ctx,
            &admin,
            TransactionsListRequest {
                kind: Some("bonus".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(
            transactions_list(&ctx, &admin, TransactionsListRequest::default())
                .expect("list")
                .is_empty()
        );
    }
}
