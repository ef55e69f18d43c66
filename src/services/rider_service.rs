use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::profiles::{CreateRiderRequest, RiderProfileList, UpdateRiderRequest},
    entity::rider_profiles::{
        ActiveModel as RiderActive, Column as RiderCol, Entity as RiderProfiles,
        Model as RiderModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    models::RiderProfile,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    scope::RequestScope,
    state::AppState,
};

/// Non-riders get an empty page, never an error.
pub async fn list_riders(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<RiderProfileList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = RiderProfiles::find().filter(scope.rider_profiles());
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(rider_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Rider profiles",
        RiderProfileList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_rider(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<RiderProfile>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let found = RiderProfiles::find_by_id(id)
        .filter(scope.rider_profiles())
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Rider profile",
        rider_from_entity(found),
        None,
    ))
}

pub async fn create_rider(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRiderRequest,
) -> AppResult<ApiResponse<RiderProfile>> {
    ensure_role(user, Role::Rider)?;

    let exists = RiderProfiles::find()
        .filter(RiderCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest("Profile already exists".into()));
    }

    let rider = RiderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        vehicle_type: Set(payload.vehicle_type),
        license_number: Set(payload.license_number),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Rider profile created",
        rider_from_entity(rider),
        Some(Meta::empty()),
    ))
}

pub async fn update_rider(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRiderRequest,
) -> AppResult<ApiResponse<RiderProfile>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = RiderProfiles::find_by_id(id)
        .filter(scope.rider_profiles())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: RiderActive = existing.into();
    if let Some(vehicle_type) = payload.vehicle_type {
        active.vehicle_type = Set(vehicle_type);
    }
    if let Some(license_number) = payload.license_number {
        active.license_number = Set(license_number);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        rider_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_rider(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = RiderProfiles::find_by_id(id)
        .filter(scope.rider_profiles())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    // Orders keep their rows; their rider reference clears to null.
    RiderProfiles::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn rider_from_entity(model: RiderModel) -> RiderProfile {
    RiderProfile {
        id: model.id,
        user_id: model.user_id,
        vehicle_type: model.vehicle_type,
        license_number: model.license_number,
        is_active: model.is_active,
    }
}
