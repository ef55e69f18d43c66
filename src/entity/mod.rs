pub mod addresses;
pub mod audit_logs;
pub mod customer_profiles;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod restaurant_profiles;
pub mod reviews;
pub mod rider_profiles;
pub mod subscriptions;
pub mod users;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use customer_profiles::Entity as CustomerProfiles;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use restaurant_profiles::Entity as RestaurantProfiles;
pub use reviews::Entity as Reviews;
pub use rider_profiles::Entity as RiderProfiles;
pub use subscriptions::Entity as Subscriptions;
pub use users::Entity as Users;
