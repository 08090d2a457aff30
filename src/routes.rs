use actix_web::{
    get,
    http::Method,
    post, put,
    web::{self, Data},
    HttpRequest, HttpResponse, Responder,
};
use serde_json::json;

use crate::{
    db,
    errors::AppError,
    structs::{
        LocationUpdate, MenuCreate, OrderCreate, RestaurantCreate, RiderCreate, StatusUpdate,
        UserCreate, UserLogin,
    },
    utils, AppState,
};

fn bad_request(err: impl std::fmt::Display, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected {} {}: {}", req.method(), req.path(), err);
    AppError::BadRequest(err.to_string()).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|e, req| bad_request(e, req)))
        .app_data(web::QueryConfig::default().error_handler(|e, req| bad_request(e, req)))
        .app_data(web::JsonConfig::default().error_handler(|e, req| bad_request(e, req)))
        .service(register_user_handler)
        .service(login_handler)
        .service(register_rider_handler)
        .service(register_restaurant_handler)
        .service(add_menu_item_handler)
        .service(menu_handler)
        .service(suggest_restaurants_handler)
        .service(place_order_handler)
        .service(update_rider_location_handler)
        .service(update_order_status_handler)
        .service(user_order_history_handler)
        .service(restaurant_order_history_handler)
        .service(rider_order_history_handler);
}

#[post("/register_user")]
pub async fn register_user_handler(
    web::Json(form): web::Json<UserCreate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&[
        ("name", form.name.as_str()),
        ("address", form.address.as_str()),
        ("password", form.password.as_str()),
    ])?;
    let user = db::create_user(&state, form).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/login")]
pub async fn login_handler(
    web::Json(form): web::Json<UserLogin>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user = db::login(&state, &form.name, &form.password).await?;
    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().json(user))
}

#[post("/register_rider")]
pub async fn register_rider_handler(
    web::Json(form): web::Json<RiderCreate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&[
        ("name", form.name.as_str()),
        ("location", form.location.as_str()),
    ])?;
    let rider = db::create_rider(&state, form).await?;
    Ok(HttpResponse::Ok().json(rider))
}

#[post("/register_restaurant")]
pub async fn register_restaurant_handler(
    web::Json(form): web::Json<RestaurantCreate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&[
        ("name", form.name.as_str()),
        ("cuisine", form.cuisine.as_str()),
        ("location", form.location.as_str()),
    ])?;
    let restaurant = db::create_restaurant(&state, form).await?;
    Ok(HttpResponse::Ok().json(restaurant))
}

#[post("/add_menu_item")]
pub async fn add_menu_item_handler(
    web::Json(form): web::Json<MenuCreate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&[("item_name", form.item_name.as_str())])?;
    utils::validate_price(form.price)?;
    let item = db::add_menu_item(&state, form).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[get("/menu/{restaurant_id}")]
pub async fn menu_handler(
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let items = db::get_menu(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// `max_time` is part of the path clients send but does not filter anything.
#[get("/suggest_restaurants/{cuisine}/{max_time}")]
pub async fn suggest_restaurants_handler(
    path: web::Path<(String, i64)>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (cuisine, _max_time) = path.into_inner();
    let restaurants = db::search_restaurants(&state, &cuisine).await?;
    Ok(HttpResponse::Ok().json(restaurants))
}

#[post("/place_order")]
pub async fn place_order_handler(
    web::Json(form): web::Json<OrderCreate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let order = db::place_order(&state, form.user_id, form.restaurant_id)
        .await
        .map_err(|e| {
            log::error!("Failed to place order: {}", e);
            e
        })?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/update_rider_location/{rider_id}")]
pub async fn update_rider_location_handler(
    path: web::Path<i64>,
    query: web::Query<LocationUpdate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&[("location", query.location.as_str())])?;
    db::update_rider_location(&state, path.into_inner(), &query.location).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Rider location updated" })))
}

#[put("/update_order_status/{order_id}")]
pub async fn update_order_status_handler(
    path: web::Path<i64>,
    query: web::Query<StatusUpdate>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    utils::require_non_empty(&[("status", query.status.as_str())])?;
    let order = db::update_order_status(&state, path.into_inner(), &query.status).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[get("/user_order_history/{user_id}")]
pub async fn user_order_history_handler(
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let orders = db::user_order_history(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[get("/restaurant_order_history/{restaurant_id}")]
pub async fn restaurant_order_history_handler(
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let orders = db::restaurant_orders(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[get("/rider_order_history/{rider_id}")]
pub async fn rider_order_history_handler(
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let orders = db::rider_completed_orders(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn default_handler(req_method: Method) -> impl Responder {
    match req_method {
        Method::GET => HttpResponse::NotFound().json(json!({ "detail": "Not Found" })),
        _ => HttpResponse::MethodNotAllowed().finish(),
    }
}
