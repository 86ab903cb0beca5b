//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId};
use domain::{Entity, LineItem, Order, OrderStatus, sort_orders_by_date, sort_orders_by_price};
use serde::{Deserialize, Serialize};
use store::{Repository, StoreError};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub sort: Option<String>,
    #[serde(default)]
    pub descending: bool,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: Option<i64>,
    pub customer_id: i64,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub items_count: i64,
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl From<&LineItem> for OrderItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id().map(|id| id.get()),
            product_name: item.product().name().to_string(),
            quantity: item.quantity(),
            unit_price_cents: item.product().price().cents(),
            subtotal_cents: item.subtotal().cents(),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().map(|id| id.get()),
            customer_id: order.customer_id().get(),
            status: order.status(),
            items: order.items().iter().map(OrderItemResponse::from).collect(),
            items_count: order.items_count(),
            total_price_cents: order.total_price().cents(),
            created_at: order.created_at(),
        }
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Order {id} not found"))
}

// -- Handlers --

/// POST /orders: build an order from stored products and persist it.
#[tracing::instrument(skip(state, req), fields(customer_id = req.customer_id, items = req.items.len()))]
pub async fn create<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let mut order = Order::create(CustomerId::new(req.customer_id))?;

    for item in &req.items {
        let product_id = ProductId::new(item.product_id);
        let product = state
            .repo
            .get_product(product_id)
            .await?
            .ok_or(StoreError::ProductNotFound(product_id))?;
        order.add_item(product, item.quantity)?;
    }

    let stored = state.repo.add_order(order).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&stored))))
}

/// GET /orders: list orders, optionally sorted by `date` or `price`.
#[tracing::instrument(skip(state))]
pub async fn list<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let mut orders = state.repo.get_all_orders().await?;

    match query.sort.as_deref() {
        None => {}
        Some("date") => sort_orders_by_date(&mut orders, query.descending),
        Some("price") => sort_orders_by_price(&mut orders, query.descending),
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown sort key: {other} (expected date or price)"
            )));
        }
    }

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /orders/{id}: load an order with its line items.
#[tracing::instrument(skip(state))]
pub async fn get<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .repo
        .get_order(OrderId::new(id))
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(OrderResponse::from(&order)))
}

/// PUT /orders/{id}/status: move an order to another status.
#[tracing::instrument(skip(state, req), fields(status = %req.status))]
pub async fn update_status<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let status: OrderStatus = req.status.parse()?;
    let order_id = OrderId::new(id);
    if !state.repo.update_order_status(order_id, status).await? {
        return Err(not_found(id));
    }
    let order = state
        .repo
        .get_order(order_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(OrderResponse::from(&order)))
}

/// DELETE /orders/{id}: delete an order and its line items.
#[tracing::instrument(skip(state))]
pub async fn delete<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_order(OrderId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
