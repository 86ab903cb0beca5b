//! Product CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::ProductId;
use domain::{Entity, Money, Product};
use serde::{Deserialize, Serialize};
use store::Repository;

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: Option<i64>,
    pub name: String,
    pub price_cents: i64,
    pub price: String,
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id().map(|id| id.get()),
            name: p.name().to_string(),
            price_cents: p.price().cents(),
            price: p.price().to_string(),
            description: p.description().to_string(),
            quantity: p.quantity(),
            created_at: p.created_at(),
        }
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Product {id} not found"))
}

// -- Handlers --

/// POST /products: validate and persist a new product.
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = Product::create(
        req.name,
        Money::from_cents(req.price_cents),
        req.description,
        req.quantity,
    )?;
    let stored = state.repo.add_product(product).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(&stored))))
}

/// GET /products: list all products in id order.
#[tracing::instrument(skip(state))]
pub async fn list<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.repo.get_all_products().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /products/{id}
#[tracing::instrument(skip(state))]
pub async fn get<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .repo
        .get_product(ProductId::new(id))
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ProductResponse::from(&product)))
}

/// PUT /products/{id}/quantity: overwrite the stock quantity.
#[tracing::instrument(skip(state, req), fields(quantity = req.quantity))]
pub async fn update_quantity<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = ProductId::new(id);
    if !state
        .repo
        .update_product_quantity(product_id, req.quantity)
        .await?
    {
        return Err(not_found(id));
    }
    let product = state
        .repo
        .get_product(product_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /products/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_product(ProductId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
