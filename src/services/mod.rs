pub mod address_service;
pub mod auth_service;
pub mod customer_service;
pub mod menu_service;
pub mod order_service;
pub mod payment_service;
pub mod restaurant_service;
pub mod review_service;
pub mod rider_service;
pub mod subscription_service;
pub mod user_service;
