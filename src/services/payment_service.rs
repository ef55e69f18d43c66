use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{CreatePaymentRequest, PaymentList, UpdatePaymentRequest},
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role},
    models::Payment,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    scope::RequestScope,
    state::AppState,
};

const PAYMENT_STATUSES: [&str; 3] = ["pending", "completed", "failed"];

fn validate_payment_status(status: &str) -> Result<(), AppError> {
    if PAYMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid payment status '{status}'"
        )))
    }
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = Payments::find()
        .filter(scope.payments())
        .order_by_desc(PaymentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Payments",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let found = Payments::find_by_id(id)
        .filter(scope.payments())
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Payment", payment_from_entity(found), None))
}

/// One payment per order, recorded by the order's own customer. Owners and
/// riders see the order but cannot attach money to it.
pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let customer_id = match (scope.role, scope.customer_id) {
        (Role::Customer, Some(cid)) => cid,
        (Role::Customer, None) => {
            return Err(AppError::BadRequest("No customer profile".into()));
        }
        _ => return Err(AppError::Forbidden),
    };

    let order = Orders::find_by_id(payload.order_id)
        .filter(Condition::all().add(OrderCol::CustomerId.eq(customer_id)))
        .one(&state.orm)
        .await?;
    if order.is_none() {
        return Err(AppError::NotFound);
    }

    let exists = Payments::find()
        .filter(PaymentCol::OrderId.eq(payload.order_id))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest(
            "Order already has a payment".into(),
        ));
    }

    if payload.amount < 0 {
        return Err(AppError::BadRequest("amount must not be negative".into()));
    }

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(payload.order_id),
        amount: Set(payload.amount),
        payment_method: Set(payload.payment_method),
        transaction_id: Set(payload.transaction_id),
        status: Set("pending".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_create",
        Some("payments"),
        Some(serde_json::json!({ "payment_id": payment.id, "order_id": payment.order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment recorded",
        payment_from_entity(payment),
        Some(Meta::empty()),
    ))
}

pub async fn update_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Payments::find_by_id(id)
        .filter(scope.payments())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(status) = payload.status.as_ref() {
        validate_payment_status(status)?;
    }

    let mut active: PaymentActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(transaction_id) = payload.transaction_id {
        active.transaction_id = Set(Some(transaction_id));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        payment_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Payments::find_by_id(id)
        .filter(scope.payments())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    Payments::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        order_id: model.order_id,
        amount: model.amount,
        payment_method: model.payment_method,
        transaction_id: model.transaction_id,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_values() {
        for s in PAYMENT_STATUSES {
            assert!(validate_payment_status(s).is_ok());
        }
        assert!(validate_payment_status("refunded").is_err());
    }
}
