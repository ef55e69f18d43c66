use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::profiles::{CreateRestaurantRequest, RestaurantList, UpdateRestaurantRequest},
    entity::restaurant_profiles::{
        ActiveModel as RestaurantActive, Column as RestaurantCol, Entity as RestaurantProfiles,
        Model as RestaurantModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    models::RestaurantProfile,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    scope::RequestScope,
    state::AppState,
};

/// Owners see their own restaurant; everyone else browses the active set.
pub async fn list_restaurants(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<RestaurantList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = RestaurantProfiles::find()
        .filter(scope.restaurant_profiles())
        .order_by_asc(RestaurantCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(restaurant_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Restaurants",
        RestaurantList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<RestaurantProfile>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let found = RestaurantProfiles::find_by_id(id)
        .filter(scope.restaurant_profiles())
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Restaurant",
        restaurant_from_entity(found),
        None,
    ))
}

pub async fn create_restaurant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ApiResponse<RestaurantProfile>> {
    ensure_role(user, Role::RestaurantOwner)?;

    let exists = RestaurantProfiles::find()
        .filter(RestaurantCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest("Profile already exists".into()));
    }

    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        name: Set(payload.name),
        description: Set(payload.description),
        cuisine_type: Set(payload.cuisine_type),
        address: Set(payload.address),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        operating_hours: Set(payload
            .operating_hours
            .unwrap_or_else(|| serde_json::json!({}))),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "restaurant_create",
        Some("restaurant_profiles"),
        Some(serde_json::json!({ "restaurant_id": restaurant.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Restaurant created",
        restaurant_from_entity(restaurant),
        Some(Meta::empty()),
    ))
}

pub async fn update_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRestaurantRequest,
) -> AppResult<ApiResponse<RestaurantProfile>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = RestaurantProfiles::find_by_id(id)
        .filter(scope.restaurant_profiles_writable())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: RestaurantActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(cuisine_type) = payload.cuisine_type {
        active.cuisine_type = Set(cuisine_type);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(latitude) = payload.latitude {
        active.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = payload.longitude {
        active.longitude = Set(Some(longitude));
    }
    if let Some(operating_hours) = payload.operating_hours {
        active.operating_hours = Set(operating_hours);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        restaurant_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = RestaurantProfiles::find_by_id(id)
        .filter(scope.restaurant_profiles_writable())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    // Menu items and orders referencing this restaurant go with it.
    RestaurantProfiles::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "restaurant_delete",
        Some("restaurant_profiles"),
        Some(serde_json::json!({ "restaurant_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn restaurant_from_entity(model: RestaurantModel) -> RestaurantProfile {
    RestaurantProfile {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        description: model.description,
        cuisine_type: model.cuisine_type,
        address: model.address,
        latitude: model.latitude,
        longitude: model.longitude,
        operating_hours: model.operating_hours,
        is_active: model.is_active,
    }
}
