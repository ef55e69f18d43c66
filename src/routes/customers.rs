use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::profiles::{
        CreateCustomerProfileRequest, CustomerProfileList, UpdateCustomerProfileRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::CustomerProfile,
    response::ApiResponse,
    routes::params::ListQuery,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/{id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Customer profiles in scope", body = ApiResponse<CustomerProfileList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CustomerProfileList>>> {
    Ok(Json(
        customer_service::list_profiles(&state, &user, query).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ApiResponse<CustomerProfile>),
        (status = 400, description = "Profile already exists"),
        (status = 403, description = "Role is not customer")
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCustomerProfileRequest>,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    Ok(Json(
        customer_service::create_profile(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer profile ID")),
    responses(
        (status = 200, description = "Profile", body = ApiResponse<CustomerProfile>),
        (status = 404, description = "Not found or out of scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    Ok(Json(customer_service::get_profile(&state, &user, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer profile ID")),
    request_body = UpdateCustomerProfileRequest,
    responses((status = 200, description = "Updated", body = ApiResponse<CustomerProfile>)),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerProfileRequest>,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    Ok(Json(
        customer_service::update_profile(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer profile ID")),
    responses((status = 200, description = "Deleted")),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        customer_service::delete_profile(&state, &user, id).await?,
    ))
}
