use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Order, OrderStatus, Product};

use crate::Result;

/// Core trait for catalog storage implementations.
///
/// Lookups that miss return `Ok(None)`; updates and deletes of missing
/// records return `Ok(false)`. Listings come back in storage (id) order.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Repository: Send + Sync {
    /// Persists a new product and returns it with its assigned id.
    async fn add_product(&self, product: Product) -> Result<Product>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    async fn get_all_products(&self) -> Result<Vec<Product>>;

    /// Overwrites the stock quantity. Callers reconcile stock decisions first.
    ///
    /// Fails with a validation error if `quantity` is negative.
    async fn update_product_quantity(&self, id: ProductId, quantity: i64) -> Result<bool>;

    /// Deletes a product. Fails with `StillReferenced` if any order line uses it.
    async fn delete_product(&self, id: ProductId) -> Result<bool>;

    /// Persists a new customer and returns it with its assigned id.
    ///
    /// Fails with `DuplicateEmail` if the email is already stored.
    async fn add_customer(&self, customer: Customer) -> Result<Customer>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>>;

    async fn get_all_customers(&self) -> Result<Vec<Customer>>;

    async fn update_customer_address(&self, id: CustomerId, address: &str) -> Result<bool>;

    async fn increment_customer_orders(&self, id: CustomerId) -> Result<bool>;

    /// Deletes a customer. Fails with `StillReferenced` if it owns any order.
    async fn delete_customer(&self, id: CustomerId) -> Result<bool>;

    /// Persists an order header and its line items, and increments the
    /// owning customer's order counter.
    ///
    /// The three writes are applied atomically: on any failure none of them
    /// is visible.
    async fn add_order(&self, order: Order) -> Result<Order>;

    /// Loads an order with its line items joined against current products.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    async fn get_all_orders(&self) -> Result<Vec<Order>>;

    async fn get_customer_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>>;

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<bool>;

    /// Deletes an order and its line items. The customer counter is untouched.
    async fn delete_order(&self, id: OrderId) -> Result<bool>;
}
