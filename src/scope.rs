//! Row visibility policy, in one place.
//!
//! Every read and write against a scoped collection funnels through a
//! [`RequestScope`]: a snapshot of the caller's identity plus whichever
//! profile row backs their role. Each method returns a SeaORM `Condition`
//! that narrows a query to the rows that identity may touch. Rows outside
//! the scope are indistinguishable from rows that do not exist.

use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        addresses, customer_profiles, menu_items, orders, payments, restaurant_profiles, reviews,
        rider_profiles, subscriptions, users,
    },
    error::AppResult,
    middleware::auth::{AuthUser, Role},
};

#[derive(Debug, Clone)]
pub struct RequestScope {
    pub user_id: Uuid,
    pub role: Role,
    pub customer_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub rider_id: Option<Uuid>,
}

impl RequestScope {
    /// Load the profile row backing the caller's role, if any. An identity
    /// whose role has no profile row still resolves; its scope methods then
    /// produce never-matching conditions (empty results, not errors).
    pub async fn resolve<C: ConnectionTrait>(conn: &C, user: &AuthUser) -> AppResult<Self> {
        let mut scope = RequestScope {
            user_id: user.user_id,
            role: user.role,
            customer_id: None,
            restaurant_id: None,
            rider_id: None,
        };
        match user.role {
            Role::Customer => {
                scope.customer_id = customer_profiles::Entity::find()
                    .filter(customer_profiles::Column::UserId.eq(user.user_id))
                    .one(conn)
                    .await?
                    .map(|p| p.id);
            }
            Role::RestaurantOwner => {
                scope.restaurant_id = restaurant_profiles::Entity::find()
                    .filter(restaurant_profiles::Column::UserId.eq(user.user_id))
                    .one(conn)
                    .await?
                    .map(|p| p.id);
            }
            Role::Rider => {
                scope.rider_id = rider_profiles::Entity::find()
                    .filter(rider_profiles::Column::UserId.eq(user.user_id))
                    .one(conn)
                    .await?
                    .map(|p| p.id);
            }
            Role::Admin => {}
        }
        Ok(scope)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// A condition no row satisfies. Primary keys are non-null, so
    /// `id IS NULL` selects nothing without erroring.
    fn nothing<Col: ColumnTrait>(col: Col) -> Condition {
        Condition::all().add(col.is_null())
    }

    fn everything() -> Condition {
        Condition::all()
    }

    pub fn users(&self) -> Condition {
        if self.is_admin() {
            return Self::everything();
        }
        Condition::all().add(users::Column::Id.eq(self.user_id))
    }

    pub fn customer_profiles(&self) -> Condition {
        if self.is_admin() {
            return Self::everything();
        }
        Condition::all().add(customer_profiles::Column::UserId.eq(self.user_id))
    }

    /// Owners see their own restaurant; everyone else sees the public
    /// active set, read-only.
    pub fn restaurant_profiles(&self) -> Condition {
        match self.role {
            Role::Admin => Self::everything(),
            Role::RestaurantOwner => {
                Condition::all().add(restaurant_profiles::Column::UserId.eq(self.user_id))
            }
            _ => Condition::all().add(restaurant_profiles::Column::IsActive.eq(true)),
        }
    }

    pub fn restaurant_profiles_writable(&self) -> Condition {
        match self.role {
            Role::Admin => Self::everything(),
            Role::RestaurantOwner => {
                Condition::all().add(restaurant_profiles::Column::UserId.eq(self.user_id))
            }
            _ => Self::nothing(restaurant_profiles::Column::Id),
        }
    }

    pub fn rider_profiles(&self) -> Condition {
        match self.role {
            Role::Admin => Self::everything(),
            Role::Rider => Condition::all().add(rider_profiles::Column::UserId.eq(self.user_id)),
            _ => Self::nothing(rider_profiles::Column::Id),
        }
    }

    pub fn addresses(&self) -> Condition {
        if self.is_admin() {
            return Self::everything();
        }
        Condition::all().add(addresses::Column::UserId.eq(self.user_id))
    }

    /// Menu items the caller may mutate: those of their own restaurant.
    pub fn menu_items_writable(&self) -> Condition {
        match (self.role, self.restaurant_id) {
            (Role::Admin, _) => Self::everything(),
            (Role::RestaurantOwner, Some(rid)) => {
                Condition::all().add(menu_items::Column::RestaurantId.eq(rid))
            }
            _ => Self::nothing(menu_items::Column::Id),
        }
    }

    pub fn orders(&self) -> Condition {
        match (self.role, self.customer_id, self.restaurant_id, self.rider_id) {
            (Role::Admin, ..) => Self::everything(),
            (Role::Customer, Some(cid), _, _) => {
                Condition::all().add(orders::Column::CustomerId.eq(cid))
            }
            (Role::RestaurantOwner, _, Some(rid), _) => {
                Condition::all().add(orders::Column::RestaurantId.eq(rid))
            }
            (Role::Rider, _, _, Some(rid)) => Condition::all().add(orders::Column::RiderId.eq(rid)),
            _ => Self::nothing(orders::Column::Id),
        }
    }

    /// Restaurant owners read orders but never mutate them; customers and
    /// riders mutate within their read scope.
    pub fn orders_writable(&self) -> Condition {
        match self.role {
            Role::RestaurantOwner => Self::nothing(orders::Column::Id),
            _ => self.orders(),
        }
    }

    /// Payments follow the owning order's customer.
    pub fn payments(&self) -> Condition {
        match (self.role, self.customer_id) {
            (Role::Admin, _) => Self::everything(),
            (Role::Customer, Some(cid)) => Condition::all().add(
                payments::Column::OrderId.in_subquery(
                    Query::select()
                        .column(orders::Column::Id)
                        .from(orders::Entity)
                        .and_where(orders::Column::CustomerId.eq(cid))
                        .to_owned(),
                ),
            ),
            _ => Self::nothing(payments::Column::Id),
        }
    }

    /// Reviews the caller authored. Reading reviews is public.
    pub fn reviews_writable(&self) -> Condition {
        match (self.role, self.customer_id) {
            (Role::Admin, _) => Self::everything(),
            (Role::Customer, Some(cid)) => {
                Condition::all().add(reviews::Column::CustomerId.eq(cid))
            }
            _ => Self::nothing(reviews::Column::Id),
        }
    }

    pub fn subscriptions(&self) -> Condition {
        match (self.role, self.customer_id) {
            (Role::Admin, _) => Self::everything(),
            (Role::Customer, Some(cid)) => {
                Condition::all().add(subscriptions::Column::CustomerId.eq(cid))
            }
            _ => Self::nothing(subscriptions::Column::Id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Orders;
    use sea_orm::{DbBackend, QueryTrait};

    fn scope(role: Role) -> RequestScope {
        RequestScope {
            user_id: Uuid::new_v4(),
            role,
            customer_id: None,
            restaurant_id: None,
            rider_id: None,
        }
    }

    fn orders_sql(cond: Condition) -> String {
        Orders::find()
            .filter(cond)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn rider_without_profile_sees_no_orders() {
        let sql = orders_sql(scope(Role::Rider).orders());
        assert!(sql.contains("IS NULL"), "expected never-match filter: {sql}");
    }

    #[test]
    fn customer_orders_filter_by_own_profile() {
        let mut s = scope(Role::Customer);
        let cid = Uuid::new_v4();
        s.customer_id = Some(cid);
        let sql = orders_sql(s.orders());
        assert!(sql.contains("customer_id"), "{sql}");
        assert!(sql.contains(&cid.to_string()), "{sql}");
    }

    #[test]
    fn admin_orders_have_no_row_predicate() {
        // The empty condition renders as a bare WHERE TRUE.
        let sql = orders_sql(scope(Role::Admin).orders());
        assert!(!sql.contains("customer_id"), "{sql}");
        assert!(!sql.contains("restaurant_id"), "{sql}");
        assert!(!sql.contains("rider_id"), "{sql}");
        assert!(!sql.contains("IS NULL"), "{sql}");
    }

    #[test]
    fn owner_cannot_write_orders() {
        let mut s = scope(Role::RestaurantOwner);
        s.restaurant_id = Some(Uuid::new_v4());
        let read = orders_sql(s.orders());
        assert!(read.contains("restaurant_id"), "{read}");
        let write = orders_sql(s.orders_writable());
        assert!(write.contains("IS NULL"), "{write}");
    }
}
