use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub rider_id: Option<Uuid>,
    pub status: String,
    pub total_amount: i64,
    pub delivery_address: String,
    pub delivery_instructions: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_one = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_one = "super::reviews::Entity")]
    Reviews,
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

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
