use std::str::FromStr;

use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, Entity, Order, OrderStatus, Product, ValidationError};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::records::{
    CustomerRecord, LineItemRecord, OrderRecord, ProductRecord, assemble_order, assemble_orders,
};
use crate::{Repository, Result, StoreError};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, description, quantity, created_at";

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, address, orders_count, created_at";

const ORDER_COLUMNS: &str = "id, customer_id, status, total_price_cents, created_at";

const LINE_ITEM_SELECT: &str = r#"
    SELECT oi.order_id, oi.quantity,
           p.id AS product_id, p.name AS product_name, p.price_cents,
           p.description, p.quantity AS stock, p.created_at AS product_created_at
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id
"#;

/// SQLite-backed repository.
///
/// Every operation acquires one pooled connection for its duration. Order
/// creation and deletion run inside a transaction.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to `url`, creating the database file if it does not exist.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database with migrations applied.
    ///
    /// The pool holds exactly one connection that is never recycled, since
    /// each SQLite in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let repository = Self::new(pool);
        repository.run_migrations().await?;
        Ok(repository)
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    #[tracing::instrument(skip(self, product), fields(name = product.name()), err)]
    async fn add_product(&self, product: Product) -> Result<Product> {
        let mut conn = self.pool.acquire().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, description, quantity, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.name())
        .bind(product.price().cents())
        .bind(product.description())
        .bind(product.quantity())
        .bind(product.created_at())
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        Ok(Product::restore(
            ProductId::new(id),
            product.name(),
            product.price(),
            product.description(),
            product.quantity(),
            product.created_at(),
        )?)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let mut conn = self.pool.acquire().await?;

        let record: Option<ProductRecord> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await?;

        Ok(record.map(Product::try_from).transpose()?)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_all_products(&self) -> Result<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;

        let records: Vec<ProductRecord> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
                .fetch_all(&mut *conn)
                .await?;

        records
            .into_iter()
            .map(|r| Product::try_from(r).map_err(StoreError::from))
            .collect()
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_product_quantity(&self, id: ProductId, quantity: i64) -> Result<bool> {
        if quantity < 0 {
            return Err(ValidationError::InvalidQuantity { quantity }.into());
        }

        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("UPDATE products SET quantity = ? WHERE id = ?")
            .bind(quantity)
            .bind(id.get())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = ?")
                .bind(id.get())
                .fetch_one(&mut *conn)
                .await?;
        if references > 0 {
            return Err(StoreError::StillReferenced {
                entity: Product::entity_type(),
                id: id.get(),
            });
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.get())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, customer), fields(email = customer.email()), err)]
    async fn add_customer(&self, customer: Customer) -> Result<Customer> {
        let mut conn = self.pool.acquire().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO customers (name, email, phone, address, orders_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.name())
        .bind(customer.email())
        .bind(customer.phone())
        .bind(customer.address())
        .bind(customer.orders_count())
        .bind(customer.created_at())
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateEmail {
                    email: customer.email().to_string(),
                };
            }
            StoreError::Database(e)
        })?
        .last_insert_rowid();

        Ok(Customer::restore(
            CustomerId::new(id),
            customer.name(),
            customer.email(),
            customer.phone(),
            customer.address(),
            customer.orders_count(),
            customer.created_at(),
        )?)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;

        let record: Option<CustomerRecord> =
            sqlx::query_as(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await?;

        Ok(record.map(Customer::try_from).transpose()?)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_all_customers(&self) -> Result<Vec<Customer>> {
        let mut conn = self.pool.acquire().await?;

        let records: Vec<CustomerRecord> =
            sqlx::query_as(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"))
                .fetch_all(&mut *conn)
                .await?;

        records
            .into_iter()
            .map(|r| Customer::try_from(r).map_err(StoreError::from))
            .collect()
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_customer_address(&self, id: CustomerId, address: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("UPDATE customers SET address = ? WHERE id = ?")
            .bind(address)
            .bind(id.get())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), err)]
    async fn increment_customer_orders(&self, id: CustomerId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("UPDATE customers SET orders_count = orders_count + 1 WHERE id = ?")
            .bind(id.get())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_customer(&self, id: CustomerId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;

        let references: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = ?")
            .bind(id.get())
            .fetch_one(&mut *conn)
            .await?;
        if references > 0 {
            return Err(StoreError::StillReferenced {
                entity: Customer::entity_type(),
                id: id.get(),
            });
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.get())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(
        skip(self, order),
        fields(customer_id = %order.customer_id(), items = order.items().len()),
        err
    )]
    async fn add_order(&self, order: Order) -> Result<Order> {
        // Dropping the transaction on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let customer_id = order.customer_id();
        let customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?")
            .bind(customer_id.get())
            .fetch_one(&mut *tx)
            .await?;
        if customers == 0 {
            return Err(StoreError::CustomerNotFound(customer_id));
        }

        let order_id = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, status, total_price_cents, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(customer_id.get())
        .bind(order.status().as_str())
        .bind(order.total_price().cents())
        .bind(order.created_at())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for item in order.items() {
            let product_id = item.product_id().ok_or_else(|| StoreError::TransientProduct {
                name: item.product().name().to_string(),
            })?;

            let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?")
                .bind(product_id.get())
                .fetch_one(&mut *tx)
                .await?;
            if products == 0 {
                return Err(StoreError::ProductNotFound(product_id));
            }

            sqlx::query("INSERT INTO order_items (order_id, product_id, quantity) VALUES (?, ?, ?)")
                .bind(order_id)
                .bind(product_id.get())
                .bind(item.quantity())
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE customers SET orders_count = orders_count + 1 WHERE id = ?")
            .bind(customer_id.get())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        metrics::counter!("store_orders_created").increment(1);

        Ok(Order::restore(
            OrderId::new(order_id),
            customer_id,
            order.status(),
            order.items().to_vec(),
            order.created_at(),
        ))
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let mut conn = self.pool.acquire().await?;

        let header: Option<OrderRecord> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await?;
        let Some(header) = header else {
            return Ok(None);
        };

        let lines: Vec<LineItemRecord> =
            sqlx::query_as(&format!("{LINE_ITEM_SELECT} WHERE oi.order_id = ? ORDER BY oi.id"))
                .bind(id.get())
                .fetch_all(&mut *conn)
                .await?;

        assemble_order(header, lines).map(Some)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_all_orders(&self) -> Result<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let headers: Vec<OrderRecord> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"))
                .fetch_all(&mut *conn)
                .await?;
        let lines: Vec<LineItemRecord> =
            sqlx::query_as(&format!("{LINE_ITEM_SELECT} ORDER BY oi.id"))
                .fetch_all(&mut *conn)
                .await?;

        assemble_orders(headers, lines)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_customer_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let headers: Vec<OrderRecord> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = ? ORDER BY id"
        ))
        .bind(customer_id.get())
        .fetch_all(&mut *conn)
        .await?;
        let lines: Vec<LineItemRecord> = sqlx::query_as(&format!(
            "{LINE_ITEM_SELECT} WHERE oi.order_id IN (SELECT id FROM orders WHERE customer_id = ?) ORDER BY oi.id"
        ))
        .bind(customer_id.get())
        .fetch_all(&mut *conn)
        .await?;

        assemble_orders(headers, lines)
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.get())
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            metrics::counter!("store_orders_deleted").increment(1);
        }
        Ok(deleted)
    }
}
