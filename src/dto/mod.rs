pub mod addresses;
pub mod auth;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod profiles;
pub mod reviews;
pub mod subscriptions;
pub mod users;
