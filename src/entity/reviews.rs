use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub rider_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::customer_profiles::Entity",
        from = "Column::CustomerId",
        to = "super::customer_profiles::Column::Id"
    )]
    CustomerProfiles,
    #[sea_orm(
        belongs_to = "super::restaurant_profiles::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant_profiles::Column::Id"
    )]
    RestaurantProfiles,
    #[sea_orm(
        belongs_to = "super::rider_profiles::Entity",
        from = "Column::RiderId",
        to = "super::rider_profiles::Column::Id"
    )]
    RiderProfiles,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::customer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerProfiles.def()
    }
}

impl Related<super::restaurant_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantProfiles.def()
    }
}

impl Related<super::rider_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RiderProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
