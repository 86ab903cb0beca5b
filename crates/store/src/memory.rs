use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Entity, Order, OrderStatus, Product, ValidationError};
use tokio::sync::RwLock;

use crate::records::{
    CustomerRecord, LineItemRecord, OrderItemRecord, OrderRecord, ProductRecord, assemble_order,
    assemble_orders,
};
use crate::{Repository, Result, StoreError};

/// Table contents plus id sequences. Ids are never reused.
#[derive(Default)]
struct Tables {
    products: BTreeMap<i64, ProductRecord>,
    customers: BTreeMap<i64, CustomerRecord>,
    orders: BTreeMap<i64, OrderRecord>,
    order_items: BTreeMap<i64, OrderItemRecord>,
    last_product_id: i64,
    last_customer_id: i64,
    last_order_id: i64,
    last_order_item_id: i64,
}

impl Tables {
    fn lines_where(&self, keep: impl Fn(&OrderItemRecord) -> bool) -> Vec<LineItemRecord> {
        // Inner join: lines whose product row is gone are dropped.
        self.order_items
            .values()
            .filter(|item| keep(item))
            .filter_map(|item| {
                self.products
                    .get(&item.product_id)
                    .map(|product| LineItemRecord::join(item, product))
            })
            .collect()
    }
}

/// In-memory repository implementation for testing.
///
/// Keeps the same row-level model as the SQLite implementation, so joins
/// and ordering behave identically.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn add_product(&self, product: Product) -> Result<Product> {
        let mut tables = self.tables.write().await;
        tables.last_product_id += 1;
        let id = tables.last_product_id;

        let record = ProductRecord {
            id,
            name: product.name().to_string(),
            price_cents: product.price().cents(),
            description: product.description().to_string(),
            quantity: product.quantity(),
            created_at: product.created_at(),
        };
        tables.products.insert(id, record.clone());

        Ok(Product::try_from(record)?)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .get(&id.get())
            .cloned()
            .map(Product::try_from)
            .transpose()?)
    }

    async fn get_all_products(&self) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        tables
            .products
            .values()
            .cloned()
            .map(|r| Product::try_from(r).map_err(StoreError::from))
            .collect()
    }

    async fn update_product_quantity(&self, id: ProductId, quantity: i64) -> Result<bool> {
        if quantity < 0 {
            return Err(ValidationError::InvalidQuantity { quantity }.into());
        }

        let mut tables = self.tables.write().await;
        match tables.products.get_mut(&id.get()) {
            Some(record) => {
                record.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .order_items
            .values()
            .any(|item| item.product_id == id.get())
        {
            return Err(StoreError::StillReferenced {
                entity: Product::entity_type(),
                id: id.get(),
            });
        }
        Ok(tables.products.remove(&id.get()).is_some())
    }

    async fn add_customer(&self, customer: Customer) -> Result<Customer> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .values()
            .any(|existing| existing.email == customer.email())
        {
            return Err(StoreError::DuplicateEmail {
                email: customer.email().to_string(),
            });
        }

        tables.last_customer_id += 1;
        let id = tables.last_customer_id;

        let record = CustomerRecord {
            id,
            name: customer.name().to_string(),
            email: customer.email().to_string(),
            phone: customer.phone().to_string(),
            address: customer.address().to_string(),
            orders_count: customer.orders_count(),
            created_at: customer.created_at(),
        };
        tables.customers.insert(id, record.clone());

        Ok(Customer::try_from(record)?)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .get(&id.get())
            .cloned()
            .map(Customer::try_from)
            .transpose()?)
    }

    async fn get_all_customers(&self) -> Result<Vec<Customer>> {
        let tables = self.tables.read().await;
        tables
            .customers
            .values()
            .cloned()
            .map(|r| Customer::try_from(r).map_err(StoreError::from))
            .collect()
    }

    async fn update_customer_address(&self, id: CustomerId, address: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.customers.get_mut(&id.get()) {
            Some(record) => {
                record.address = address.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_customer_orders(&self, id: CustomerId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.customers.get_mut(&id.get()) {
            Some(record) => {
                record.orders_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .orders
            .values()
            .any(|order| order.customer_id == id.get())
        {
            return Err(StoreError::StillReferenced {
                entity: Customer::entity_type(),
                id: id.get(),
            });
        }
        Ok(tables.customers.remove(&id.get()).is_some())
    }

    async fn add_order(&self, order: Order) -> Result<Order> {
        let mut tables = self.tables.write().await;

        // Validate everything before the first write so failures leave no trace.
        let customer_id = order.customer_id();
        if !tables.customers.contains_key(&customer_id.get()) {
            return Err(StoreError::CustomerNotFound(customer_id));
        }
        let mut lines = Vec::with_capacity(order.items().len());
        for item in order.items() {
            let product_id = item.product_id().ok_or_else(|| StoreError::TransientProduct {
                name: item.product().name().to_string(),
            })?;
            if !tables.products.contains_key(&product_id.get()) {
                return Err(StoreError::ProductNotFound(product_id));
            }
            lines.push((product_id, item.quantity()));
        }

        tables.last_order_id += 1;
        let order_id = tables.last_order_id;
        tables.orders.insert(
            order_id,
            OrderRecord {
                id: order_id,
                customer_id: customer_id.get(),
                status: order.status().as_str().to_string(),
                total_price_cents: order.total_price().cents(),
                created_at: order.created_at(),
            },
        );

        for (product_id, quantity) in lines {
            tables.last_order_item_id += 1;
            let item_id = tables.last_order_item_id;
            tables.order_items.insert(
                item_id,
                OrderItemRecord {
                    id: item_id,
                    order_id,
                    product_id: product_id.get(),
                    quantity,
                },
            );
        }

        if let Some(customer) = tables.customers.get_mut(&customer_id.get()) {
            customer.orders_count += 1;
        }
        metrics::counter!("store_orders_created").increment(1);

        Ok(Order::restore(
            OrderId::new(order_id),
            customer_id,
            order.status(),
            order.items().to_vec(),
            order.created_at(),
        ))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let tables = self.tables.read().await;
        let Some(header) = tables.orders.get(&id.get()).cloned() else {
            return Ok(None);
        };
        let lines = tables.lines_where(|item| item.order_id == id.get());
        assemble_order(header, lines).map(Some)
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        let headers = tables.orders.values().cloned().collect();
        let lines = tables.lines_where(|_| true);
        assemble_orders(headers, lines)
    }

    async fn get_customer_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        let headers: Vec<OrderRecord> = tables
            .orders
            .values()
            .filter(|order| order.customer_id == customer_id.get())
            .cloned()
            .collect();
        let lines = tables.lines_where(|item| {
            tables
                .orders
                .get(&item.order_id)
                .is_some_and(|order| order.customer_id == customer_id.get())
        });
        assemble_orders(headers, lines)
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&id.get()) {
            Some(record) => {
                record.status = status.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.order_items.retain(|_, item| item.order_id != id.get());
        let deleted = tables.orders.remove(&id.get()).is_some();
        if deleted {
            metrics::counter!("store_orders_deleted").increment(1);
        }
        Ok(deleted)
    }
}
