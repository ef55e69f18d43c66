use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::subscriptions::{
        CreateSubscriptionRequest, SubscriptionList, UpdateSubscriptionRequest,
    },
    entity::subscriptions::{
        ActiveModel as SubscriptionActive, Column as SubscriptionCol, Entity as Subscriptions,
        Model as SubscriptionModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role},
    models::Subscription,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    scope::RequestScope,
    state::AppState,
};

const PLAN_TYPES: [&str; 3] = ["weekly", "bi_weekly", "monthly"];
const SUBSCRIPTION_STATUSES: [&str; 3] = ["active", "paused", "cancelled"];

fn validate_plan_type(plan: &str) -> Result<(), AppError> {
    if PLAN_TYPES.contains(&plan) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid plan type '{plan}'")))
    }
}

fn validate_subscription_status(status: &str) -> Result<(), AppError> {
    if SUBSCRIPTION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid subscription status '{status}'"
        )))
    }
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    query: ListQuery,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = Subscriptions::find()
        .filter(scope.subscriptions())
        .order_by_desc(SubscriptionCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(subscription_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Subscriptions",
        SubscriptionList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_subscription(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Subscription>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let found = Subscriptions::find_by_id(id)
        .filter(scope.subscriptions())
        .one(&state.orm)
        .await?;
    let found = match found {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Subscription",
        subscription_from_entity(found),
        None,
    ))
}

pub async fn create_subscription(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSubscriptionRequest,
) -> AppResult<ApiResponse<Subscription>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let customer_id = match (scope.role, scope.customer_id) {
        (Role::Customer, Some(cid)) => cid,
        (Role::Customer, None) => {
            return Err(AppError::BadRequest("No customer profile".into()));
        }
        _ => return Err(AppError::Forbidden),
    };

    validate_plan_type(&payload.plan_type)?;

    let subscription = SubscriptionActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        plan_type: Set(payload.plan_type),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        status: Set("active".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Subscription created",
        subscription_from_entity(subscription),
        Some(Meta::empty()),
    ))
}

/// Status moves are caller-driven writes; no renewal engine advances them.
pub async fn update_subscription(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSubscriptionRequest,
) -> AppResult<ApiResponse<Subscription>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Subscriptions::find_by_id(id)
        .filter(scope.subscriptions())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    if let Some(plan_type) = payload.plan_type.as_ref() {
        validate_plan_type(plan_type)?;
    }
    if let Some(status) = payload.status.as_ref() {
        validate_subscription_status(status)?;
    }

    let mut active: SubscriptionActive = existing.into();
    if let Some(plan_type) = payload.plan_type {
        active.plan_type = Set(plan_type);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(Some(end_date));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        subscription_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_subscription(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Subscriptions::find_by_id(id)
        .filter(scope.subscriptions())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    Subscriptions::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn subscription_from_entity(model: SubscriptionModel) -> Subscription {
    Subscription {
        id: model.id,
        customer_id: model.customer_id,
        plan_type: model.plan_type,
        start_date: model.start_date,
        end_date: model.end_date,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_and_status_values() {
        for p in PLAN_TYPES {
            assert!(validate_plan_type(p).is_ok());
        }
        assert!(validate_plan_type("yearly").is_err());

        for s in SUBSCRIPTION_STATUSES {
            assert!(validate_subscription_status(s).is_ok());
        }
        assert!(validate_subscription_status("expired").is_err());
    }
}
