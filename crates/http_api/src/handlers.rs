use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};
use betslip_core::{AiModelInput, LlmProviderInput, ModelTokenCostInput, RoleAssignment};

use app_api::{
    ActivityLogsRequest, AnalyzeRequest, AnalyzerLogsRequest, BalanceGrantRequest,
    BalanceSetRequest, BetTypeCreateRequest, BetTypeUpdateRequest, DeductRequest, EmptyRequest,
    FeedCreateRequest, FeedUpdateRequest, IdRequest, ModelUpdateRequest, ModelsListRequest,
    ProviderUpdateRequest, RoleAssignRequest, RolesListRequest, SportCreateRequest,
    SportUpdateRequest, TransactionsListRequest, UserRequest,
};

use crate::{
    errors::{AppJson, HttpError},
    state::HttpState,
};

type Caller = Extension<RoleAssignment>;

pub async fn analyzer_with_tokens(
    State(state): State<HttpState>,
    AppJson(req): AppJson<AnalyzeRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::analyze_with_tokens(ctx, req))
        .await?;
    Ok(Json(response))
}

pub async fn deduct_tokens(
    State(state): State<HttpState>,
    AppJson(req): AppJson<DeductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| Ok(app_api::deduct_tokens(ctx, req)))
        .await??;
    Ok(Json(response))
}

pub async fn roles_me(
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(app_api::roles_me(&caller)))
}

pub async fn roles_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<RolesListRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::roles_list(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn roles_assign(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<RoleAssignRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::roles_assign(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn roles_revoke(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::roles_revoke(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn balances_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::balances_list(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn balances_set(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<BalanceSetRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::balances_set(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn balances_grant(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<BalanceGrantRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::balances_grant(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn balances_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<UserRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::balances_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn costs_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::costs_list(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn costs_put(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<ModelTokenCostInput>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::costs_put(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn costs_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::costs_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn models_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<ModelsListRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::models_list(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn models_create(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<AiModelInput>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::models_create(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn models_update(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<ModelUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::models_update(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn models_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::models_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn providers_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::providers_list(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn providers_create(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<LlmProviderInput>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::providers_create(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn providers_update(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<ProviderUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::providers_update(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn providers_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::providers_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn sports_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::sports_list(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn sports_create(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<SportCreateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::sports_create(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn sports_update(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<SportUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::sports_update(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn sports_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::sports_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn bet_types_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::bet_types_list(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn bet_types_create(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<BetTypeCreateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::bet_types_create(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn bet_types_update(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<BetTypeUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::bet_types_update(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn bet_types_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::bet_types_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn feeds_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::feeds_list(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn feeds_create(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<FeedCreateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::feeds_create(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn feeds_update(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<FeedUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::feeds_update(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn feeds_delete(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::feeds_delete(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn transactions_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<TransactionsListRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::transactions_list(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn transactions_summary(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(_): AppJson<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::transactions_summary(ctx, &caller))
        .await?;
    Ok(Json(response))
}

pub async fn analyzer_logs_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<AnalyzerLogsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::analyzer_logs_list(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}

pub async fn activity_logs_list(
    State(state): State<HttpState>,
    Extension(caller): Caller,
    AppJson(req): AppJson<ActivityLogsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = state
        .run(move |ctx| app_api::activity_logs_list(ctx, &caller, req))
        .await?;
    Ok(Json(response))
}
