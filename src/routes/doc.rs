use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::AddressList,
        auth,
        menu::MenuItemList,
        orders::{OrderList, OrderWithItems},
        payments::PaymentList,
        profiles::{CustomerProfileList, RestaurantList, RiderProfileList},
        reviews::ReviewList,
        subscriptions::SubscriptionList,
        users::UserList,
    },
    models::{
        Address, CustomerProfile, MenuItem, Order, OrderItem, Payment, RestaurantProfile, Review,
        RiderProfile, Subscription, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        addresses, auth as auth_routes, customers, health, menu_items, orders, params, payments,
        restaurants, reviews, riders, subscriptions, users,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth_routes::register,
        auth_routes::login,
        users::me,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        customers::list_profiles,
        customers::create_profile,
        customers::get_profile,
        customers::update_profile,
        customers::delete_profile,
        restaurants::list_restaurants,
        restaurants::create_restaurant,
        restaurants::get_restaurant,
        restaurants::update_restaurant,
        restaurants::delete_restaurant,
        riders::list_riders,
        riders::create_rider,
        riders::get_rider,
        riders::update_rider,
        riders::delete_rider,
        menu_items::list_menu_items,
        menu_items::get_menu_item,
        menu_items::create_menu_item,
        menu_items::update_menu_item,
        menu_items::delete_menu_item,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        payments::list_payments,
        payments::create_payment,
        payments::get_payment,
        payments::update_payment,
        payments::delete_payment,
        reviews::list_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        subscriptions::list_subscriptions,
        subscriptions::create_subscription,
        subscriptions::get_subscription,
        subscriptions::update_subscription,
        subscriptions::delete_subscription,
        addresses::list_addresses,
        addresses::create_address,
        addresses::get_address,
        addresses::update_address,
        addresses::delete_address,
    ),
    components(
        schemas(
            User,
            CustomerProfile,
            RestaurantProfile,
            RiderProfile,
            MenuItem,
            Address,
            Order,
            OrderItem,
            Payment,
            Review,
            Subscription,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            UserList,
            CustomerProfileList,
            RestaurantList,
            RiderProfileList,
            MenuItemList,
            AddressList,
            OrderList,
            OrderWithItems,
            PaymentList,
            ReviewList,
            SubscriptionList,
            params::Pagination,
            params::OrderListQuery,
            params::MenuItemQuery,
            Meta,
            ApiResponse<User>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<MenuItemList>,
            ApiResponse<RestaurantList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Account endpoints"),
        (name = "Customers", description = "Customer profile endpoints"),
        (name = "Restaurants", description = "Restaurant profile endpoints"),
        (name = "Riders", description = "Rider profile endpoints"),
        (name = "Menu", description = "Menu item endpoints"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Payments", description = "Payment record endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Subscriptions", description = "Subscription endpoints"),
        (name = "Addresses", description = "Address book endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
