mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware as axum_middleware,
    routing::post,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use errors::{AppJson, HttpError};
pub use middleware::ADMIN_USER_HEADER;
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let functions = Router::new()
        .route(
            "/analyzer-with-tokens",
            post(handlers::analyzer_with_tokens),
        )
        .route("/deduct-tokens", post(handlers::deduct_tokens))
        .layer(cors_layer());

    let admin = Router::new()
        .route("/roles_me", post(handlers::roles_me))
        .route("/roles_list", post(handlers::roles_list))
        .route("/roles_assign", post(handlers::roles_assign))
        .route("/roles_revoke", post(handlers::roles_revoke))
        .route("/balances_list", post(handlers::balances_list))
        .route("/balances_set", post(handlers::balances_set))
        .route("/balances_grant", post(handlers::balances_grant))
        .route("/balances_delete", post(handlers::balances_delete))
        .route("/costs_list", post(handlers::costs_list))
        .route("/costs_put", post(handlers::costs_put))
        .route("/costs_delete", post(handlers::costs_delete))
        .route("/models_list", post(handlers::models_list))
        .route("/models_create", post(handlers::models_create))
        .route("/models_update", post(handlers::models_update))
        .route("/models_delete", post(handlers::models_delete))
        .route("/providers_list", post(handlers::providers_list))
        .route("/providers_create", post(handlers::providers_create))
        .route("/providers_update", post(handlers::providers_update))
        .route("/providers_delete", post(handlers::providers_delete))
        .route("/sports_list", post(handlers::sports_list))
        .route("/sports_create", post(handlers::sports_create))
        .route("/sports_update", post(handlers::sports_update))
        .route("/sports_delete", post(handlers::sports_delete))
        .route("/bet_types_list", post(handlers::bet_types_list))
        .route("/bet_types_create", post(handlers::bet_types_create))
        .route("/bet_types_update", post(handlers::bet_types_update))
        .route("/bet_types_delete", post(handlers::bet_types_delete))
        .route("/feeds_list", post(handlers::feeds_list))
        .route("/feeds_create", post(handlers::feeds_create))
        .route("/feeds_update", post(handlers::feeds_update))
        .route("/feeds_delete", post(handlers::feeds_delete))
        .route("/transactions_list", post(handlers::transactions_list))
        .route("/transactions_summary", post(handlers::transactions_summary))
        .route("/analyzer_logs_list", post(handlers::analyzer_logs_list))
        .route("/activity_logs_list", post(handlers::activity_logs_list))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .nest("/functions", functions)
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}
