use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems, UpdateOrderRequest},
    entity::{
        menu_items::{Column as MenuItemCol, Entity as MenuItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        rider_profiles::Entity as RiderProfiles,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    scope::RequestScope,
    state::AppState,
};

/// Delivery progression. Status writes move strictly forward along this
/// chain; `cancelled` is reachable from any non-terminal state.
const STATUS_CHAIN: [&str; 5] = [
    "pending",
    "preparing",
    "ready_for_pickup",
    "in_transit",
    "delivered",
];
const STATUS_CANCELLED: &str = "cancelled";

fn status_rank(status: &str) -> Option<usize> {
    STATUS_CHAIN.iter().position(|s| *s == status)
}

fn is_terminal(status: &str) -> bool {
    status == STATUS_CANCELLED || status == "delivered"
}

fn validate_transition(from: &str, to: &str) -> Result<(), AppError> {
    if to == STATUS_CANCELLED {
        if is_terminal(from) {
            return Err(AppError::BadRequest(format!(
                "Cannot cancel a {from} order"
            )));
        }
        return Ok(());
    }
    let Some(to_rank) = status_rank(to) else {
        return Err(AppError::BadRequest(format!("Invalid order status '{to}'")));
    };
    let Some(from_rank) = status_rank(from) else {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {from} to {to}"
        )));
    };
    if to_rank <= from_rank {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {from} to {to}"
        )));
    }
    Ok(())
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all().add(scope.orders());
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Place an order: header plus all line items in one transaction. The
/// customer is the caller; each item's price is captured from the menu at
/// this moment and never re-read.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let customer_id = match (scope.role, scope.customer_id) {
        (Role::Customer, Some(cid)) => cid,
        (Role::Customer, None) => {
            return Err(AppError::BadRequest("No customer profile".into()));
        }
        _ => return Err(AppError::Forbidden),
    };

    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".into()));
    }
    for item in &payload.items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest("quantity must be at least 1".into()));
        }
    }

    let txn = state.orm.begin().await?;

    // Capture current menu prices under a row lock so a concurrent price
    // edit cannot split the order across two price versions.
    let mut captured: Vec<(Uuid, i32, i64, Option<String>)> = Vec::new();
    let mut total: i64 = 0;
    for item in &payload.items {
        let menu_item = MenuItems::find_by_id(item.menu_item_id)
            .filter(
                Condition::all()
                    .add(MenuItemCol::RestaurantId.eq(payload.restaurant_id))
                    .add(MenuItemCol::IsAvailable.eq(true)),
            )
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let menu_item = match menu_item {
            Some(m) => m,
            None => return Err(AppError::NotFound),
        };
        total += menu_item.price * (item.quantity as i64);
        captured.push((
            menu_item.id,
            item.quantity,
            menu_item.price,
            item.special_instructions.clone(),
        ));
    }

    if let Some(client_total) = payload.total_amount {
        if client_total != total {
            return Err(AppError::BadRequest(format!(
                "total_amount {client_total} does not match computed total {total}"
            )));
        }
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        restaurant_id: Set(payload.restaurant_id),
        rider_id: Set(None),
        status: Set("pending".into()),
        total_amount: Set(total),
        delivery_address: Set(payload.delivery_address),
        delivery_instructions: Set(payload.delivery_instructions),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();
    for (menu_item_id, quantity, item_price, special_instructions) in captured {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(menu_item_id),
            quantity: Set(quantity),
            item_price: Set(item_price),
            special_instructions: Set(special_instructions),
        }
        .insert(&txn)
        .await?;
        order_items.push(order_item_from_entity(item));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_amount": total })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order: order_from_entity(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let order = Orders::find_by_id(id)
        .filter(scope.orders())
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Generic authorized update: status transitions, rider assignment, and
/// delivery fields, all within the caller's writable scope.
pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Orders::find_by_id(id)
        .filter(scope.orders_writable())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if let Some(status) = payload.status.as_ref() {
        validate_transition(&existing.status, status)?;
    }
    if let Some(rider_id) = payload.rider_id {
        let rider = RiderProfiles::find_by_id(rider_id).one(&state.orm).await?;
        if rider.is_none() {
            return Err(AppError::NotFound);
        }
    }

    let mut active: OrderActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(rider_id) = payload.rider_id {
        active.rider_id = Set(Some(rider_id));
    }
    if let Some(delivery_address) = payload.delivery_address {
        active.delivery_address = Set(delivery_address);
    }
    if let Some(delivery_instructions) = payload.delivery_instructions {
        active.delivery_instructions = Set(Some(delivery_instructions));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Orders::find_by_id(id)
        .filter(scope.orders_writable())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    // Items, payment, and review go with the order.
    Orders::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
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

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        customer_id: model.customer_id,
        restaurant_id: model.restaurant_id,
        rider_id: model.rider_id,
        status: model.status,
        total_amount: model.total_amount,
        delivery_address: model.delivery_address,
        delivery_instructions: model.delivery_instructions,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        menu_item_id: model.menu_item_id,
        quantity: model.quantity,
        item_price: model.item_price,
        special_instructions: model.special_instructions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_move_forward_only() {
        assert!(validate_transition("pending", "preparing").is_ok());
        assert!(validate_transition("pending", "in_transit").is_ok());
        assert!(validate_transition("preparing", "ready_for_pickup").is_ok());
        assert!(validate_transition("in_transit", "delivered").is_ok());

        assert!(validate_transition("preparing", "pending").is_err());
        assert!(validate_transition("delivered", "in_transit").is_err());
        assert!(validate_transition("pending", "pending").is_err());
    }

    #[test]
    fn cancellation_allowed_from_any_non_terminal_state() {
        for from in ["pending", "preparing", "ready_for_pickup", "in_transit"] {
            assert!(validate_transition(from, "cancelled").is_ok(), "{from}");
        }
        assert!(validate_transition("delivered", "cancelled").is_err());
        assert!(validate_transition("cancelled", "cancelled").is_err());
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(validate_transition("pending", "shipped").is_err());
        assert!(validate_transition("pending", "").is_err());
    }
}
