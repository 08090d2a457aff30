use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Executor, Sqlite, SqlitePool,
};

use crate::{
    config::Config,
    errors::{AppError, USERNAME_TAKEN},
    structs::{
        MenuCreate, MenuItem, Order, Restaurant, RestaurantCreate, Rider, RiderCreate, User,
        UserCreate, STATUS_COMPLETED, STATUS_PENDING,
    },
    utils, AppState,
};

pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .read_only(false)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(opts)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    log::info!("Database migrated successfully");
    Ok(pool)
}

async fn ensure_exists<'c, E>(executor: E, table: &str, id: i64, what: &str) -> Result<(), AppError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<_, i64>(&format!("SELECT id FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => {
            log::warn!("{what} with id {id} does not exist");
            Err(AppError::NotFound(format!("{what} not found")))
        }
    }
}

pub async fn create_user(state: &AppState, user: UserCreate) -> Result<User, AppError> {
    let pool = state.db_pool.clone();
    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE name = $1")
        .bind(&user.name)
        .fetch_optional(&pool)
        .await?;
    if existing.is_some() {
        log::warn!("Registration rejected, name {:?} already taken", user.name);
        return Err(AppError::Conflict(USERNAME_TAKEN.to_owned()));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, address, password, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user.name)
    .bind(user.address)
    .bind(user.password)
    .bind(utils::now())
    .fetch_one(&pool)
    .await?;
    log::info!("User created: {} ({})", user.name, user.id);
    Ok(user)
}

pub async fn login(state: &AppState, name: &str, password: &str) -> Result<User, AppError> {
    let pool = state.db_pool.clone();
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1")
        .bind(name)
        .fetch_optional(&pool)
        .await?;

    match user {
        Some(user) if utils::verify_password(password, &user.password) => Ok(user),
        _ => {
            log::warn!("Failed login attempt for {name:?}");
            Err(AppError::NotFound("Invalid credentials".to_owned()))
        }
    }
}

pub async fn create_rider(state: &AppState, rider: RiderCreate) -> Result<Rider, AppError> {
    let pool = state.db_pool.clone();
    let created_at = utils::now();
    let rider = sqlx::query_as::<_, Rider>(
        "INSERT INTO riders (name, location, is_available, created_at, updated_at) VALUES ($1, $2, 1, $3, $3) RETURNING *",
    )
    .bind(rider.name)
    .bind(rider.location)
    .bind(&created_at)
    .fetch_one(&pool)
    .await?;
    log::info!("Rider created: {:?}", rider);
    Ok(rider)
}

pub async fn create_restaurant(
    state: &AppState,
    restaurant: RestaurantCreate,
) -> Result<Restaurant, AppError> {
    let pool = state.db_pool.clone();
    let restaurant = sqlx::query_as::<_, Restaurant>(
        "INSERT INTO restaurants (name, cuisine, location, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(restaurant.name)
    .bind(restaurant.cuisine)
    .bind(restaurant.location)
    .bind(utils::now())
    .fetch_one(&pool)
    .await?;
    log::info!("Restaurant created: {:?}", restaurant);
    Ok(restaurant)
}

pub async fn add_menu_item(state: &AppState, item: MenuCreate) -> Result<MenuItem, AppError> {
    let pool = state.db_pool.clone();
    ensure_exists(&pool, "restaurants", item.restaurant_id, "Restaurant").await?;

    let item = sqlx::query_as::<_, MenuItem>(
        "INSERT INTO menu (restaurant_id, item_name, price, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(item.restaurant_id)
    .bind(item.item_name)
    .bind(item.price)
    .bind(utils::now())
    .fetch_one(&pool)
    .await?;
    log::info!("Menu item created: {:?}", item);
    Ok(item)
}

pub async fn get_menu(state: &AppState, restaurant_id: i64) -> Result<Vec<MenuItem>, AppError> {
    let pool = state.db_pool.clone();
    ensure_exists(&pool, "restaurants", restaurant_id, "Restaurant").await?;

    let items = sqlx::query_as::<_, MenuItem>(
        "SELECT * FROM menu WHERE restaurant_id = $1 ORDER BY id",
    )
    .bind(restaurant_id)
    .fetch_all(&pool)
    .await?;
    Ok(items)
}

/// Case-insensitive substring match on cuisine. An empty result is a miss.
pub async fn search_restaurants(state: &AppState, cuisine: &str) -> Result<Vec<Restaurant>, AppError> {
    let pool = state.db_pool.clone();
    let restaurants = sqlx::query_as::<_, Restaurant>(
        "SELECT * FROM restaurants WHERE LOWER(cuisine) LIKE '%' || LOWER($1) || '%' ORDER BY id",
    )
    .bind(cuisine)
    .fetch_all(&pool)
    .await?;

    if restaurants.is_empty() {
        return Err(AppError::NotFound("No restaurants found".to_owned()));
    }
    Ok(restaurants)
}

/// Creates a pending order and hands it to a randomly chosen available rider.
///
/// Everything runs in one transaction: the rider's availability flag flips
/// together with the order insert, and any early return rolls both back.
/// The transaction takes the write lock up front, so a concurrent placement
/// waits on the busy timeout instead of failing its snapshot upgrade.
pub async fn place_order(
    state: &AppState,
    user_id: i64,
    restaurant_id: i64,
) -> Result<Order, AppError> {
    let mut tx = state.db_pool.begin_with("BEGIN IMMEDIATE").await?;

    ensure_exists(&mut *tx, "users", user_id, "User").await?;
    ensure_exists(&mut *tx, "restaurants", restaurant_id, "Restaurant").await?;

    let available = sqlx::query_as::<_, Rider>("SELECT * FROM riders WHERE is_available = 1")
        .fetch_all(&mut *tx)
        .await?;
    let rider_id = utils::choose_rider(&available, &mut rand::thread_rng()).map(|rider| rider.id);

    let now = utils::now();
    match rider_id {
        Some(id) => {
            sqlx::query("UPDATE riders SET is_available = 0, updated_at = $1 WHERE id = $2")
                .bind(&now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            log::info!(
                "Assigned rider {} out of {} available to order from user {}",
                id,
                available.len(),
                user_id
            );
        }
        None => log::warn!("No riders available, order from user {user_id} left unassigned"),
    }

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (user_id, restaurant_id, rider_id, status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $5) RETURNING *",
    )
    .bind(user_id)
    .bind(restaurant_id)
    .bind(rider_id)
    .bind(STATUS_PENDING)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!("Order created: {:?}", order);
    Ok(order)
}

pub async fn update_rider_location(
    state: &AppState,
    rider_id: i64,
    location: &str,
) -> Result<Rider, AppError> {
    let pool = state.db_pool.clone();
    let rider = sqlx::query_as::<_, Rider>(
        "UPDATE riders SET location = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(location)
    .bind(utils::now())
    .bind(rider_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Rider not found".to_owned()))?;
    log::info!("Rider {} moved to {:?}", rider.id, rider.location);
    Ok(rider)
}

/// Sets an order's status. The assigned rider keeps its availability flag.
pub async fn update_order_status(
    state: &AppState,
    order_id: i64,
    status: &str,
) -> Result<Order, AppError> {
    let pool = state.db_pool.clone();
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(status)
    .bind(utils::now())
    .bind(order_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;
    log::info!("Order {} is now {:?}", order.id, order.status);
    Ok(order)
}

pub async fn user_order_history(state: &AppState, user_id: i64) -> Result<Vec<Order>, AppError> {
    let pool = state.db_pool.clone();
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(&pool)
        .await?;
    Ok(orders)
}

pub async fn restaurant_orders(
    state: &AppState,
    restaurant_id: i64,
) -> Result<Vec<Order>, AppError> {
    let pool = state.db_pool.clone();
    let orders =
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE restaurant_id = $1 ORDER BY id")
            .bind(restaurant_id)
            .fetch_all(&pool)
            .await?;
    Ok(orders)
}

pub async fn rider_completed_orders(
    state: &AppState,
    rider_id: i64,
) -> Result<Vec<Order>, AppError> {
    let pool = state.db_pool.clone();
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE rider_id = $1 AND status = $2 ORDER BY id",
    )
    .bind(rider_id)
    .bind(STATUS_COMPLETED)
    .fetch_all(&pool)
    .await?;
    Ok(orders)
}
