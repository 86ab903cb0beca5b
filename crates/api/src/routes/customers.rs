//! Customer CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::CustomerId;
use domain::{Customer, Entity};
use serde::{Deserialize, Serialize};
use store::Repository;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::orders::OrderResponse;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Deserialize)]
pub struct UpdateAddressRequest {
    pub address: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerResponse {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id().map(|id| id.get()),
            name: c.name().to_string(),
            email: c.email().to_string(),
            phone: c.phone().to_string(),
            address: c.address().to_string(),
            orders_count: c.orders_count(),
            created_at: c.created_at(),
        }
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Customer {id} not found"))
}

// -- Handlers --

/// POST /customers: validate and persist a new customer.
#[tracing::instrument(skip(state, req))]
pub async fn create<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = Customer::create(req.name, req.email, req.phone, req.address)?;
    let stored = state.repo.add_customer(customer).await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&stored))))
}

/// GET /customers: list all customers in id order.
#[tracing::instrument(skip(state))]
pub async fn list<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.repo.get_all_customers().await?;
    Ok(Json(customers.iter().map(CustomerResponse::from).collect()))
}

/// GET /customers/{id}
#[tracing::instrument(skip(state))]
pub async fn get<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .repo
        .get_customer(CustomerId::new(id))
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// PUT /customers/{id}/address
#[tracing::instrument(skip(state, req))]
pub async fn update_address<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAddressRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id = CustomerId::new(id);
    if !state
        .repo
        .update_customer_address(customer_id, &req.address)
        .await?
    {
        return Err(not_found(id));
    }
    let customer = state
        .repo
        .get_customer(customer_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// GET /customers/{id}/orders: all orders placed by one customer.
#[tracing::instrument(skip(state))]
pub async fn orders<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let customer_id = CustomerId::new(id);
    if state.repo.get_customer(customer_id).await?.is_none() {
        return Err(not_found(id));
    }
    let orders = state.repo.get_customer_orders(customer_id).await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// DELETE /customers/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_customer(CustomerId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
