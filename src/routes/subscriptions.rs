use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::subscriptions::{
        CreateSubscriptionRequest, SubscriptionList, UpdateSubscriptionRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Subscription,
    response::ApiResponse,
    routes::params::ListQuery,
    services::subscription_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route(
            "/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}

#[utoipa::path(
    get,
    path = "/api/subscriptions",
    responses(
        (status = 200, description = "Caller's subscriptions", body = ApiResponse<SubscriptionList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<SubscriptionList>>> {
    Ok(Json(
        subscription_service::list_subscriptions(&state, &user, query).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = ApiResponse<Subscription>),
        (status = 400, description = "Invalid plan type")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    Ok(Json(
        subscription_service::create_subscription(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses((status = 200, description = "Subscription", body = ApiResponse<Subscription>)),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn get_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    Ok(Json(
        subscription_service::get_subscription(&state, &user, id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/subscriptions/{id}",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Subscription>),
        (status = 400, description = "Invalid plan type or status")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn update_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> AppResult<Json<ApiResponse<Subscription>>> {
    Ok(Json(
        subscription_service::update_subscription(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/subscriptions/{id}",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses((status = 200, description = "Deleted")),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        subscription_service::delete_subscription(&state, &user, id).await?,
    ))
}
