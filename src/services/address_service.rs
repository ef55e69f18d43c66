use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
    entity::addresses::{
        ActiveModel as AddressActive, Entity as Addresses, Model as AddressModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    scope::RequestScope,
    state::AppState,
};

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<AddressList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = Addresses::find().filter(scope.addresses());
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(address_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Addresses",
        AddressList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Address>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let found = Addresses::find_by_id(id)
        .filter(scope.addresses())
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Address", address_from_entity(found), None))
}

/// The owner field is always the caller, whatever the payload says.
pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        street: Set(payload.street),
        city: Set(payload.city),
        state: Set(payload.state),
        country: Set(payload.country),
        postal_code: Set(payload.postal_code),
        is_default: Set(payload.is_default.unwrap_or(false)),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Address created",
        address_from_entity(address),
        Some(Meta::empty()),
    ))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Addresses::find_by_id(id)
        .filter(scope.addresses())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let mut active: AddressActive = existing.into();
    if let Some(street) = payload.street {
        active.street = Set(street);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(state_field) = payload.state {
        active.state = Set(state_field);
    }
    if let Some(country) = payload.country {
        active.country = Set(country);
    }
    if let Some(postal_code) = payload.postal_code {
        active.postal_code = Set(postal_code);
    }
    if let Some(is_default) = payload.is_default {
        active.is_default = Set(is_default);
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        address_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Addresses::find_by_id(id)
        .filter(scope.addresses())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    // Customer profiles pointing at this address fall back to null.
    Addresses::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn address_from_entity(model: AddressModel) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        street: model.street,
        city: model.city,
        state: model.state,
        country: model.country,
        postal_code: model.postal_code,
        is_default: model.is_default,
    }
}
