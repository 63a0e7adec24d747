//! HTTP handlers.
//!
//! Thin request/response mapping: bodies are validated, orders go through the
//! pricing engine, results go to the stores, and every failure propagates as
//! an [`AppError`] for the central classifier to render.

use axum::{Json, extract::Path, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    CreateOrderPayload, Dish, DishPayload, NewOrder, Order, OrderChanges, OrderItemView,
    OrderView, UpdateOrderPayload, normalize,
};
use crate::pricing::price_order;
use crate::state::AppState;
use crate::store::DishStore;

pub async fn root_handler() -> &'static str {
    "Welcome to the Restaurant Ordering System API!"
}

pub async fn fallback_handler() -> AppError {
    AppError::RouteNotFound
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

/// Joins each line's dish reference to the current dish record for display.
/// A dish deleted since the order was placed renders as `null`; the stored
/// quantity and price snapshot are returned as-is either way.
async fn expand_order(order: Order, dishes: &dyn DishStore) -> Result<OrderView, AppError> {
    let mut items = Vec::with_capacity(order.items.len());
    for item in order.items {
        items.push(OrderItemView {
            dish: dishes.find_by_id(item.dish).await?,
            quantity: item.quantity,
            price: item.price,
        });
    }

    Ok(OrderView {
        id: order.id,
        items,
        total_amount: order.total_amount,
        status: order.status,
        customer_name: order.customer_name,
        customer_contact: order.customer_contact,
        created_at: order.created_at,
        updated_at: order.updated_at,
    })
}

pub async fn list_dishes_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Dish>>, AppError> {
    Ok(Json(state.dishes.list_all().await?))
}

pub async fn create_dish_handler(
    State(state): State<AppState>,
    Json(payload): Json<DishPayload>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate_create()?;
    let dish = state.dishes.create(new).await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

pub async fn get_dish_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Dish>, AppError> {
    let id = parse_id(&id)?;
    let dish = state
        .dishes
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Dish"))?;
    Ok(Json(dish))
}

pub async fn update_dish_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DishPayload>,
) -> Result<Json<Dish>, AppError> {
    let id = parse_id(&id)?;
    let changes = payload.validate_update()?;
    let dish = state
        .dishes
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound("Dish"))?;
    Ok(Json(dish))
}

pub async fn delete_dish_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !state.dishes.delete(id).await? {
        return Err(AppError::NotFound("Dish"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_orders_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    let mut views = Vec::new();
    for order in state.orders.list_all().await? {
        views.push(expand_order(order, state.dishes.as_ref()).await?);
    }
    Ok(Json(views))
}

pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    // The whole item list is validated and priced before any write; a
    // rejection here means nothing was persisted.
    let priced = price_order(state.dishes.as_ref(), &payload.items).await?;

    let order = state
        .orders
        .create(NewOrder {
            items: priced.items,
            total_amount: priced.total_amount,
            customer_name: normalize(payload.customer_name),
            customer_contact: normalize(payload.customer_contact),
        })
        .await?;

    let view = expand_order(order, state.dishes.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, AppError> {
    let id = parse_id(&id)?;
    let order = state
        .orders
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    Ok(Json(expand_order(order, state.dishes.as_ref()).await?))
}

pub async fn update_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<OrderView>, AppError> {
    let id = parse_id(&id)?;

    let mut changes = OrderChanges {
        status: payload.status,
        customer_name: normalize(payload.customer_name),
        customer_contact: normalize(payload.customer_contact),
        ..Default::default()
    };

    // A present item list re-runs the engine and replaces both the items and
    // the total wholesale; the previous total is never merged in.
    if let Some(items) = &payload.items {
        let priced = price_order(state.dishes.as_ref(), items).await?;
        changes.items = Some(priced.items);
        changes.total_amount = Some(priced.total_amount);
    }

    let order = state
        .orders
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    Ok(Json(expand_order(order, state.dishes.as_ref()).await?))
}

pub async fn delete_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !state.orders.delete(id).await? {
        return Err(AppError::NotFound("Order"));
    }
    Ok(StatusCode::NO_CONTENT)
}
