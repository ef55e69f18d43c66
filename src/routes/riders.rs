use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::profiles::{CreateRiderRequest, RiderProfileList, UpdateRiderRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::RiderProfile,
    response::ApiResponse,
    routes::params::ListQuery,
    services::rider_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_riders).post(create_rider))
        .route(
            "/{id}",
            get(get_rider).put(update_rider).delete(delete_rider),
        )
}

#[utoipa::path(
    get,
    path = "/api/riders",
    responses(
        (status = 200, description = "Own rider profile; empty for other roles", body = ApiResponse<RiderProfileList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Riders"
)]
pub async fn list_riders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<RiderProfileList>>> {
    Ok(Json(rider_service::list_riders(&state, &user, query).await?))
}

#[utoipa::path(
    post,
    path = "/api/riders",
    request_body = CreateRiderRequest,
    responses(
        (status = 201, description = "Rider profile created", body = ApiResponse<RiderProfile>),
        (status = 403, description = "Role is not rider")
    ),
    security(("bearer_auth" = [])),
    tag = "Riders"
)]
pub async fn create_rider(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRiderRequest>,
) -> AppResult<Json<ApiResponse<RiderProfile>>> {
    Ok(Json(
        rider_service::create_rider(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/riders/{id}",
    params(("id" = Uuid, Path, description = "Rider profile ID")),
    responses((status = 200, description = "Rider profile", body = ApiResponse<RiderProfile>)),
    security(("bearer_auth" = [])),
    tag = "Riders"
)]
pub async fn get_rider(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RiderProfile>>> {
    Ok(Json(rider_service::get_rider(&state, &user, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/riders/{id}",
    params(("id" = Uuid, Path, description = "Rider profile ID")),
    request_body = UpdateRiderRequest,
    responses((status = 200, description = "Updated", body = ApiResponse<RiderProfile>)),
    security(("bearer_auth" = [])),
    tag = "Riders"
)]
pub async fn update_rider(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRiderRequest>,
) -> AppResult<Json<ApiResponse<RiderProfile>>> {
    Ok(Json(
        rider_service::update_rider(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/riders/{id}",
    params(("id" = Uuid, Path, description = "Rider profile ID")),
    responses((status = 200, description = "Deleted; orders keep rows with rider cleared")),
    security(("bearer_auth" = [])),
    tag = "Riders"
)]
pub async fn delete_rider(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(rider_service::delete_rider(&state, &user, id).await?))
}
