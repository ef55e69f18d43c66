use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
    entity::menu_items::{
        ActiveModel as MenuItemActive, Column as MenuItemCol, Entity as MenuItems,
        Model as MenuItemModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, OptionalAuthUser, Role},
    models::MenuItem,
    response::{ApiResponse, Meta},
    routes::params::MenuItemQuery,
    scope::RequestScope,
    state::AppState,
};

/// Browse visibility: available items only, except that a restaurant owner
/// also sees their own unavailable ones. Anonymous callers are welcome.
async fn browse_condition(
    state: &AppState,
    user: &OptionalAuthUser,
    restaurant_filter: Option<Uuid>,
) -> AppResult<Condition> {
    let mut visible = Condition::any().add(MenuItemCol::IsAvailable.eq(true));

    if let Some(user) = &user.0 {
        let scope = RequestScope::resolve(&state.orm, user).await?;
        if scope.is_admin() {
            visible = Condition::any().add(MenuItemCol::Id.is_not_null());
        } else if let (Role::RestaurantOwner, Some(rid)) = (scope.role, scope.restaurant_id) {
            visible = visible.add(MenuItemCol::RestaurantId.eq(rid));
        }
    }

    let mut condition = Condition::all().add(visible);
    if let Some(rid) = restaurant_filter {
        condition = condition.add(MenuItemCol::RestaurantId.eq(rid));
    }
    Ok(condition)
}

pub async fn list_menu_items(
    state: &AppState,
    user: &OptionalAuthUser,
    query: MenuItemQuery,
) -> AppResult<ApiResponse<MenuItemList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let condition = browse_condition(state, user, query.restaurant_id).await?;

    let finder = MenuItems::find()
        .filter(condition)
        .order_by_asc(MenuItemCol::Category)
        .order_by_asc(MenuItemCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Menu items",
        MenuItemList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_menu_item(
    state: &AppState,
    user: &OptionalAuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<MenuItem>> {
    let condition = browse_condition(state, user, None).await?;
    let found = MenuItems::find_by_id(id)
        .filter(condition)
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Menu item",
        menu_item_from_entity(found),
        None,
    ))
}

/// Items are always created under the caller's own restaurant.
pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let restaurant_id = match (scope.role, scope.restaurant_id) {
        (Role::RestaurantOwner, Some(rid)) => rid,
        (Role::RestaurantOwner, None) => {
            return Err(AppError::BadRequest("No restaurant profile".into()));
        }
        _ => return Err(AppError::Forbidden),
    };

    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        is_available: Set(payload.is_available.unwrap_or(true)),
        image_url: Set(payload.image_url),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_create",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = MenuItems::find_by_id(id)
        .filter(scope.menu_items_writable())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
    }

    let mut active: MenuItemActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        menu_item_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = MenuItems::find_by_id(id)
        .filter(scope.menu_items_writable())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    MenuItems::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_delete",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": id })),
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

fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        is_available: model.is_available,
        image_url: model.image_url,
    }
}
