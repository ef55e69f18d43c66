use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::profiles::{CreateCustomerProfileRequest, CustomerProfileList, UpdateCustomerProfileRequest},
    entity::{
        addresses::{Column as AddressCol, Entity as Addresses},
        customer_profiles::{
            ActiveModel as ProfileActive, Column as ProfileCol, Entity as CustomerProfiles,
            Model as ProfileModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    models::CustomerProfile,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    scope::RequestScope,
    state::AppState,
};

pub async fn list_profiles(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<CustomerProfileList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = CustomerProfiles::find().filter(scope.customer_profiles());
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(profile_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Customer profiles",
        CustomerProfileList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_profile(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let found = CustomerProfiles::find_by_id(id)
        .filter(scope.customer_profiles())
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Customer profile",
        profile_from_entity(found),
        None,
    ))
}

/// The profile is always attached to the caller; a second profile for the
/// same user is rejected.
pub async fn create_profile(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCustomerProfileRequest,
) -> AppResult<ApiResponse<CustomerProfile>> {
    ensure_role(user, Role::Customer)?;

    let exists = CustomerProfiles::find()
        .filter(ProfileCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest("Profile already exists".into()));
    }

    if let Some(address_id) = payload.default_address_id {
        check_own_address(state, user, address_id).await?;
    }

    let profile = ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        default_address_id: Set(payload.default_address_id),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Profile created",
        profile_from_entity(profile),
        Some(Meta::empty()),
    ))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCustomerProfileRequest,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = CustomerProfiles::find_by_id(id)
        .filter(scope.customer_profiles())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(address_id) = payload.default_address_id {
        check_own_address(state, user, address_id).await?;
    }

    let mut active: ProfileActive = existing.into();
    if let Some(address_id) = payload.default_address_id {
        active.default_address_id = Set(Some(address_id));
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        profile_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_profile(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = CustomerProfiles::find_by_id(id)
        .filter(scope.customer_profiles())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    CustomerProfiles::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// The default address must belong to the caller; anything else reads as
/// missing.
async fn check_own_address(state: &AppState, user: &AuthUser, address_id: Uuid) -> AppResult<()> {
    let owned = Addresses::find_by_id(address_id)
        .filter(Condition::all().add(AddressCol::UserId.eq(user.user_id)))
        .one(&state.orm)
        .await?;
    if owned.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn profile_from_entity(model: ProfileModel) -> CustomerProfile {
    CustomerProfile {
        id: model.id,
        user_id: model.user_id,
        default_address_id: model.default_address_id,
    }
}
