use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_COMPLETED: &str = "Completed";

/// Free-text input is stored without surrounding whitespace. Passwords are
/// left untouched since login compares them verbatim.
fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_owned())
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Rider {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub is_available: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub item_name: String,
    pub price: f64,
    pub created_at: String,
}

/// An order placed by a user at a restaurant. `rider_id` stays `None` when
/// no rider was available at placement time.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub rider_id: Option<i64>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct UserCreate {
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    pub address: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UserLogin {
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RiderCreate {
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    pub location: String,
}

#[derive(Deserialize)]
pub struct RestaurantCreate {
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    pub cuisine: String,
    #[serde(deserialize_with = "trimmed")]
    pub location: String,
}

#[derive(Deserialize)]
pub struct MenuCreate {
    pub restaurant_id: i64,
    #[serde(deserialize_with = "trimmed")]
    pub item_name: String,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct OrderCreate {
    pub user_id: i64,
    pub restaurant_id: i64,
}

#[derive(Deserialize)]
pub struct LocationUpdate {
    #[serde(deserialize_with = "trimmed")]
    pub location: String,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    #[serde(deserialize_with = "trimmed")]
    pub status: String,
}
