use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        reviews::{
            ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews,
            Model as ReviewModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, OptionalAuthUser, Role},
    models::Review,
    response::{ApiResponse, Meta},
    routes::params::ReviewListQuery,
    scope::RequestScope,
    state::AppState,
};

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "rating must be between 1 and 5".into(),
        ))
    }
}

/// Reviews are public reading material; anonymous callers allowed.
pub async fn list_reviews(
    state: &AppState,
    _user: &OptionalAuthUser,
    query: ReviewListQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(restaurant_id) = query.restaurant_id {
        condition = condition.add(ReviewCol::RestaurantId.eq(restaurant_id));
    }

    let finder = Reviews::find()
        .filter(condition)
        .order_by_desc(ReviewCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_review(
    state: &AppState,
    _user: &OptionalAuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Review>> {
    let found = Reviews::find_by_id(id).one(&state.orm).await?;
    let found = match found {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Review", review_from_entity(found), None))
}

/// One review per order, written by the order's customer. Restaurant and
/// rider are copied from the order, never taken from the payload.
pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let customer_id = match (scope.role, scope.customer_id) {
        (Role::Customer, Some(cid)) => cid,
        (Role::Customer, None) => {
            return Err(AppError::BadRequest("No customer profile".into()));
        }
        _ => return Err(AppError::Forbidden),
    };

    validate_rating(payload.rating)?;

    let order = Orders::find_by_id(payload.order_id)
        .filter(Condition::all().add(OrderCol::CustomerId.eq(customer_id)))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let exists = Reviews::find()
        .filter(ReviewCol::OrderId.eq(order.id))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest(
            "Order already has a review".into(),
        ));
    }

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        customer_id: Set(customer_id),
        restaurant_id: Set(order.restaurant_id),
        rider_id: Set(order.rider_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_create",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id, "order_id": review.order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review created",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Reviews::find_by_id(id)
        .filter(scope.reviews_writable())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }

    let mut active: ReviewActive = existing.into();
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(Some(comment));
    }
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        review_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let scope = RequestScope::resolve(&state.orm, user).await?;
    let existing = Reviews::find_by_id(id)
        .filter(scope.reviews_writable())
        .one(&state.orm)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    Reviews::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        order_id: model.order_id,
        customer_id: model.customer_id,
        restaurant_id: model.restaurant_id,
        rider_id: model.rider_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_inclusive() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-1).is_err());
    }
}
