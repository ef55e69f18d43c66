use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use bukaflex_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{customer_profiles, menu_items, restaurant_profiles, rider_profiles, users},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let conn = create_orm_conn(&config.database_url).await?;
    run_migrations(&conn).await?;

    let admin_id = ensure_user(&conn, "admin", "admin@bukaflex.test", "admin123", "admin").await?;
    let customer_id = ensure_user(
        &conn,
        "ada",
        "ada@bukaflex.test",
        "customer123",
        "customer",
    )
    .await?;
    let owner_id = ensure_user(
        &conn,
        "mama_cass",
        "owner@bukaflex.test",
        "owner123",
        "restaurant_owner",
    )
    .await?;
    let rider_id = ensure_user(
        &conn,
        "tunde",
        "rider@bukaflex.test",
        "rider123",
        "rider",
    )
    .await?;

    ensure_customer_profile(&conn, customer_id).await?;
    let restaurant_id = ensure_restaurant(&conn, owner_id).await?;
    ensure_rider_profile(&conn, rider_id).await?;
    ensure_menu(&conn, restaurant_id).await?;

    tracing::info!("seed complete (admin user: {})", admin_id);

    Ok(())
}

async fn ensure_user(
    conn: &OrmConn,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        phone_number: Set(String::new()),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    tracing::info!("created {} user {}", role, user.username);
    Ok(user.id)
}

async fn ensure_customer_profile(conn: &OrmConn, user_id: Uuid) -> anyhow::Result<Uuid> {
    if let Some(existing) = customer_profiles::Entity::find()
        .filter(customer_profiles::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }

    let profile = customer_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        default_address_id: Set(None),
    }
    .insert(conn)
    .await?;

    Ok(profile.id)
}

async fn ensure_restaurant(conn: &OrmConn, user_id: Uuid) -> anyhow::Result<Uuid> {
    if let Some(existing) = restaurant_profiles::Entity::find()
        .filter(restaurant_profiles::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }

    let restaurant = restaurant_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set("Mama Cass Kitchen".to_string()),
        description: Set(Some("Home-style Nigerian cooking".to_string())),
        cuisine_type: Set("Nigerian".to_string()),
        address: Set("12 Allen Avenue, Ikeja, Lagos".to_string()),
        latitude: Set(Some(6.601_838)),
        longitude: Set(Some(3.351_486)),
        operating_hours: Set(json!({
            "mon-fri": "08:00-21:00",
            "sat-sun": "10:00-22:00",
        })),
        is_active: Set(true),
    }
    .insert(conn)
    .await?;

    tracing::info!("created restaurant {}", restaurant.name);
    Ok(restaurant.id)
}

async fn ensure_rider_profile(conn: &OrmConn, user_id: Uuid) -> anyhow::Result<Uuid> {
    if let Some(existing) = rider_profiles::Entity::find()
        .filter(rider_profiles::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }

    let rider = rider_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        vehicle_type: Set("motorcycle".to_string()),
        license_number: Set("LAG-8841-XY".to_string()),
        is_active: Set(true),
    }
    .insert(conn)
    .await?;

    Ok(rider.id)
}

async fn ensure_menu(conn: &OrmConn, restaurant_id: Uuid) -> anyhow::Result<()> {
    let existing = menu_items::Entity::find()
        .filter(menu_items::Column::RestaurantId.eq(restaurant_id))
        .one(conn)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    // Prices are stored in minor units (kobo).
    let items = [
        ("Jollof Rice", "mains", 250_000_i64),
        ("Egusi Soup with Pounded Yam", "mains", 380_000),
        ("Suya Platter", "grills", 420_000),
        ("Chapman", "drinks", 120_000),
    ];

    for (name, category, price) in items {
        menu_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(restaurant_id),
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(price),
            category: Set(category.to_string()),
            is_available: Set(true),
            image_url: Set(None),
        }
        .insert(conn)
        .await?;
    }

    tracing::info!("seeded {} menu items", items.len());
    Ok(())
}
