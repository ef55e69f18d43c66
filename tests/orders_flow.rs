use bukaflex_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        menu::UpdateMenuItemRequest,
        orders::{CreateOrderRequest, NewOrderItem, UpdateOrderRequest},
        payments::CreatePaymentRequest,
        profiles::UpdateCustomerProfileRequest,
        reviews::CreateReviewRequest,
    },
    entity::{
        addresses::ActiveModel as AddressActive,
        customer_profiles::ActiveModel as CustomerProfileActive,
        menu_items::{
            ActiveModel as MenuItemActive, Column as MenuItemCol, Entity as MenuItems,
        },
        orders::Entity as Orders,
        restaurant_profiles::ActiveModel as RestaurantActive,
        rider_profiles::ActiveModel as RiderActive, users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::{AuthUser, Role},
    routes::params::{OrderListQuery, Pagination},
    services::{
        customer_service, menu_service, order_service, payment_service, restaurant_service,
        review_service, rider_service,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement,
};
use serde_json::json;
use uuid::Uuid;

// Full lifecycle: a customer places a two-line order, prices stay frozen when
// the menu changes, other callers cannot see the order, and the status chain
// only moves forward.
#[tokio::test]
async fn order_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Seed accounts
    let customer_user = create_user(&state, "customer", "ada@example.com").await?;
    let other_customer_user = create_user(&state, "customer", "bola@example.com").await?;
    let owner_user = create_user(&state, "restaurant_owner", "owner@example.com").await?;
    let rider_user = create_user(&state, "rider", "rider@example.com").await?;
    let admin_user = create_user(&state, "admin", "admin@example.com").await?;

    let customer_id = create_customer_profile(&state, customer_user).await?;
    create_customer_profile(&state, other_customer_user).await?;
    let restaurant_id = create_restaurant(&state, owner_user).await?;
    let rider_id = create_rider_profile(&state, rider_user).await?;

    let jollof = create_menu_item(&state, restaurant_id, "Jollof Rice", 250_000).await?;
    let suya = create_menu_item(&state, restaurant_id, "Suya Platter", 420_000).await?;

    let auth_customer = AuthUser {
        user_id: customer_user,
        role: Role::Customer,
    };
    let auth_other_customer = AuthUser {
        user_id: other_customer_user,
        role: Role::Customer,
    };
    let auth_owner = AuthUser {
        user_id: owner_user,
        role: Role::RestaurantOwner,
    };
    let auth_rider = AuthUser {
        user_id: rider_user,
        role: Role::Rider,
    };
    let auth_admin = AuthUser {
        user_id: admin_user,
        role: Role::Admin,
    };

    // A client-supplied total that disagrees with the menu is rejected.
    let mismatch = order_service::create_order(
        &state,
        &auth_customer,
        CreateOrderRequest {
            restaurant_id,
            delivery_address: "4 Marina Road".into(),
            delivery_instructions: None,
            total_amount: Some(1),
            items: vec![NewOrderItem {
                menu_item_id: jollof,
                quantity: 1,
                special_instructions: None,
            }],
        },
    )
    .await;
    assert!(matches!(mismatch, Err(AppError::BadRequest(_))));

    // Place the real order: 2x jollof + 1x suya.
    let created = order_service::create_order(
        &state,
        &auth_customer,
        CreateOrderRequest {
            restaurant_id,
            delivery_address: "4 Marina Road".into(),
            delivery_instructions: Some("Gate code 2244".into()),
            total_amount: None,
            items: vec![
                NewOrderItem {
                    menu_item_id: jollof,
                    quantity: 2,
                    special_instructions: Some("Extra pepper".into()),
                },
                NewOrderItem {
                    menu_item_id: suya,
                    quantity: 1,
                    special_instructions: None,
                },
            ],
        },
    )
    .await?;
    let placed = created.data.expect("order payload");
    let order_id = placed.order.id;
    assert_eq!(placed.order.status, "pending");
    assert_eq!(placed.order.customer_id, customer_id);
    assert_eq!(placed.order.total_amount, 2 * 250_000 + 420_000);
    assert_eq!(placed.items.len(), 2);

    // Raising the menu price must not touch captured line prices.
    menu_service::update_menu_item(
        &state,
        &auth_owner,
        jollof,
        UpdateMenuItemRequest {
            name: None,
            description: None,
            price: Some(999_000),
            category: None,
            is_available: None,
            image_url: None,
        },
    )
    .await?;

    let reread = order_service::get_order(&state, &auth_customer, order_id)
        .await?
        .data
        .expect("order payload");
    let jollof_line = reread
        .items
        .iter()
        .find(|i| i.menu_item_id == jollof)
        .expect("jollof line");
    assert_eq!(jollof_line.item_price, 250_000);
    assert_eq!(reread.order.total_amount, 2 * 250_000 + 420_000);

    // Another customer can neither fetch nor list the order.
    let foreign = order_service::get_order(&state, &auth_other_customer, order_id).await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    let foreign_list = order_service::list_orders(&state, &auth_other_customer, default_query())
        .await?
        .data
        .expect("order list");
    assert!(foreign_list.items.is_empty());

    // A rider without assignments sees nothing.
    let rider_list = order_service::list_orders(&state, &auth_rider, default_query())
        .await?
        .data
        .expect("order list");
    assert!(rider_list.items.is_empty());

    // Admin moves the order forward and assigns the rider.
    let updated = order_service::update_order(
        &state,
        &auth_admin,
        order_id,
        UpdateOrderRequest {
            status: Some("preparing".into()),
            rider_id: Some(rider_id),
            delivery_address: None,
            delivery_instructions: None,
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(updated.status, "preparing");
    assert_eq!(updated.rider_id, Some(rider_id));

    // The assigned rider now sees the order.
    let rider_list = order_service::list_orders(&state, &auth_rider, default_query())
        .await?
        .data
        .expect("order list");
    assert_eq!(rider_list.items.len(), 1);

    // Skipping ahead in the chain is allowed.
    let delivered = order_service::update_order(
        &state,
        &auth_admin,
        order_id,
        UpdateOrderRequest {
            status: Some("delivered".into()),
            rider_id: None,
            delivery_address: None,
            delivery_instructions: None,
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(delivered.status, "delivered");

    // Moving backwards, or cancelling a delivered order, is not.
    let backwards = order_service::update_order(
        &state,
        &auth_admin,
        order_id,
        UpdateOrderRequest {
            status: Some("preparing".into()),
            rider_id: None,
            delivery_address: None,
            delivery_instructions: None,
        },
    )
    .await;
    assert!(matches!(backwards, Err(AppError::BadRequest(_))));

    let cancel = order_service::update_order(
        &state,
        &auth_admin,
        order_id,
        UpdateOrderRequest {
            status: Some("cancelled".into()),
            rider_id: None,
            delivery_address: None,
            delivery_instructions: None,
        },
    )
    .await;
    assert!(matches!(cancel, Err(AppError::BadRequest(_))));

    // Even the owning customer cannot cancel once delivered.
    let customer_cancel = order_service::update_order(
        &state,
        &auth_customer,
        order_id,
        UpdateOrderRequest {
            status: Some("cancelled".into()),
            rider_id: None,
            delivery_address: None,
            delivery_instructions: None,
        },
    )
    .await;
    assert!(matches!(customer_cancel, Err(AppError::BadRequest(_))));

    // The restaurant owner can read the order but has no write access.
    let owner_update = order_service::update_order(
        &state,
        &auth_owner,
        order_id,
        UpdateOrderRequest {
            status: Some("cancelled".into()),
            rider_id: None,
            delivery_address: None,
            delivery_instructions: None,
        },
    )
    .await;
    assert!(matches!(owner_update, Err(AppError::NotFound)));
    assert!(
        order_service::get_order(&state, &auth_owner, order_id)
            .await
            .is_ok()
    );

    // Only the order's customer can attach a payment.
    let owner_payment = payment_service::create_payment(
        &state,
        &auth_owner,
        CreatePaymentRequest {
            order_id,
            amount: 920_000,
            payment_method: "card".into(),
            transaction_id: None,
        },
    )
    .await;
    assert!(matches!(owner_payment, Err(AppError::Forbidden)));

    let payment = payment_service::create_payment(
        &state,
        &auth_customer,
        CreatePaymentRequest {
            order_id,
            amount: 920_000,
            payment_method: "card".into(),
            transaction_id: None,
        },
    )
    .await?
    .data
    .expect("payment");
    assert_eq!(payment.status, "pending");

    // One review per order; restaurant and rider come from the order row.
    let review = review_service::create_review(
        &state,
        &auth_customer,
        CreateReviewRequest {
            order_id,
            rating: 5,
            comment: Some("Suya was still warm".into()),
        },
    )
    .await?
    .data
    .expect("review");
    assert_eq!(review.restaurant_id, restaurant_id);
    assert_eq!(review.rider_id, Some(rider_id));

    let second_review = review_service::create_review(
        &state,
        &auth_customer,
        CreateReviewRequest {
            order_id,
            rating: 1,
            comment: None,
        },
    )
    .await;
    assert!(matches!(second_review, Err(AppError::BadRequest(_))));

    // A partial profile update that omits the default address keeps it.
    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(customer_user),
        street: Set("4 Marina Road".into()),
        city: Set("Lagos".into()),
        state: Set("Lagos".into()),
        country: Set("NG".into()),
        postal_code: Set("101233".into()),
        is_default: Set(true),
    }
    .insert(&state.orm)
    .await?;

    let profile = customer_service::update_profile(
        &state,
        &auth_customer,
        customer_id,
        UpdateCustomerProfileRequest {
            default_address_id: Some(address.id),
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(profile.default_address_id, Some(address.id));

    let profile = customer_service::update_profile(
        &state,
        &auth_customer,
        customer_id,
        UpdateCustomerProfileRequest {
            default_address_id: None,
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(profile.default_address_id, Some(address.id));

    // Deleting the rider leaves the order behind with its rider cleared.
    rider_service::delete_rider(&state, &auth_rider, rider_id).await?;
    let orphaned = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .expect("order row");
    assert_eq!(orphaned.rider_id, None);

    // Deleting the restaurant takes its menu items and orders with it.
    restaurant_service::delete_restaurant(&state, &auth_owner, restaurant_id).await?;
    assert!(Orders::find_by_id(order_id).one(&state.orm).await?.is_none());
    let remaining_items = MenuItems::find()
        .filter(MenuItemCol::RestaurantId.eq(restaurant_id))
        .all(&state.orm)
        .await?;
    assert!(remaining_items.is_empty());

    Ok(())
}

fn default_query() -> OrderListQuery {
    OrderListQuery {
        pagination: Pagination {
            page: None,
            per_page: None,
        },
        status: None,
        sort_order: None,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, subscriptions, reviews, payments, order_items, orders, \
         menu_items, rider_profiles, restaurant_profiles, customer_profiles, addresses, users \
         RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState::new(pool, orm))
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(email.to_string()),
        email: Set(email.to_string()),
        phone_number: Set(String::new()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_customer_profile(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let profile = CustomerProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        default_address_id: Set(None),
    }
    .insert(&state.orm)
    .await?;

    Ok(profile.id)
}

async fn create_restaurant(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set("Test Kitchen".into()),
        description: Set(None),
        cuisine_type: Set("Nigerian".into()),
        address: Set("1 Test Street".into()),
        latitude: Set(None),
        longitude: Set(None),
        operating_hours: Set(json!({})),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    Ok(restaurant.id)
}

async fn create_rider_profile(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let rider = RiderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        vehicle_type: Set("motorcycle".into()),
        license_number: Set("TEST-001".into()),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    Ok(rider.id)
}

async fn create_menu_item(
    state: &AppState,
    restaurant_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<Uuid> {
    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        category: Set("mains".into()),
        is_available: Set(true),
        image_url: Set(None),
    }
    .insert(&state.orm)
    .await?;

    Ok(item.id)
}
