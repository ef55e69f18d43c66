use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod auth;
pub mod customers;
pub mod doc;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod params;
pub mod payments;
pub mod restaurants;
pub mod reviews;
pub mod riders;
pub mod subscriptions;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/customers", customers::router())
        .nest("/restaurants", restaurants::router())
        .nest("/riders", riders::router())
        .nest("/menu-items", menu_items::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        .nest("/reviews", reviews::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/addresses", addresses::router())
}
