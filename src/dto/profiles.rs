use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CustomerProfile, RestaurantProfile, RiderProfile};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerProfileRequest {
    pub default_address_id: Option<Uuid>,
}

/// An omitted `default_address_id` is left untouched, like every other
/// partial update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCustomerProfileRequest {
    pub default_address_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerProfileList {
    pub items: Vec<CustomerProfile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub operating_hours: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub operating_hours: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantList {
    pub items: Vec<RestaurantProfile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRiderRequest {
    pub vehicle_type: String,
    pub license_number: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRiderRequest {
    pub vehicle_type: Option<String>,
    pub license_number: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RiderProfileList {
    pub items: Vec<RiderProfile>,
}
