//! CSV and JSON export, CSV import.
//!
//! Transfer goes through the [`Repository`] operations only, so imported rows
//! receive fresh ids and pass the same validation as any other insert.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use domain::{Customer, Entity, Money, Order, Product};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Repository, Result, StoreError};

const PRODUCTS_HEADER: [&str; 5] = ["ID", "Name", "Price", "Description", "Quantity"];
const CUSTOMERS_HEADER: [&str; 6] = ["ID", "Name", "Email", "Phone", "Address", "Orders Count"];
const ORDERS_HEADER: [&str; 5] = ["ID", "Customer ID", "Status", "Total Price", "Created At"];

/// Written file per entity name (`products`, `customers`, `orders`).
pub type ExportedFiles = BTreeMap<&'static str, PathBuf>;

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub products_imported: usize,
    pub products_skipped: usize,
    pub customers_imported: usize,
    pub customers_skipped: usize,
}

fn id_cell<Id: ToString>(id: Option<Id>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

async fn write_csv(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Writes `products.csv`, `customers.csv` and `orders.csv` into `dir`.
#[tracing::instrument(skip(repo), err)]
pub async fn export_csv<R: Repository + ?Sized>(repo: &R, dir: &Path) -> Result<ExportedFiles> {
    tokio::fs::create_dir_all(dir).await?;
    let mut files = ExportedFiles::new();

    let products = repo.get_all_products().await?;
    let path = dir.join("products.csv");
    let rows = products
        .iter()
        .map(|p| {
            vec![
                id_cell(p.id()),
                p.name().to_string(),
                p.price().to_string(),
                p.description().to_string(),
                p.quantity().to_string(),
            ]
        })
        .collect();
    write_csv(&path, &PRODUCTS_HEADER, rows).await?;
    files.insert("products", path);

    let customers = repo.get_all_customers().await?;
    let path = dir.join("customers.csv");
    let rows = customers
        .iter()
        .map(|c| {
            vec![
                id_cell(c.id()),
                c.name().to_string(),
                c.email().to_string(),
                c.phone().to_string(),
                c.address().to_string(),
                c.orders_count().to_string(),
            ]
        })
        .collect();
    write_csv(&path, &CUSTOMERS_HEADER, rows).await?;
    files.insert("customers", path);

    let orders = repo.get_all_orders().await?;
    let path = dir.join("orders.csv");
    let rows = orders
        .iter()
        .map(|o| {
            vec![
                id_cell(o.id()),
                o.customer_id().to_string(),
                o.status().to_string(),
                o.total_price().to_string(),
                o.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
            ]
        })
        .collect();
    write_csv(&path, &ORDERS_HEADER, rows).await?;
    files.insert("orders", path);

    info!(
        products = products.len(),
        customers = customers.len(),
        orders = orders.len(),
        "Exported CSV"
    );
    Ok(files)
}

#[derive(Serialize)]
struct ProductDocument<'a> {
    id: Option<i64>,
    name: &'a str,
    price: f64,
    description: &'a str,
    quantity: i64,
}

impl<'a> From<&'a Product> for ProductDocument<'a> {
    fn from(p: &'a Product) -> Self {
        Self {
            id: p.id().map(|id| id.get()),
            name: p.name(),
            price: p.price().to_f64(),
            description: p.description(),
            quantity: p.quantity(),
        }
    }
}

#[derive(Serialize)]
struct CustomerDocument<'a> {
    id: Option<i64>,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    address: &'a str,
    orders_count: i64,
}

impl<'a> From<&'a Customer> for CustomerDocument<'a> {
    fn from(c: &'a Customer) -> Self {
        Self {
            id: c.id().map(|id| id.get()),
            name: c.name(),
            email: c.email(),
            phone: c.phone(),
            address: c.address(),
            orders_count: c.orders_count(),
        }
    }
}

#[derive(Serialize)]
struct OrderDocument {
    id: Option<i64>,
    customer_id: i64,
    status: &'static str,
    total_price: f64,
    items_count: i64,
    created_at: String,
}

impl From<&Order> for OrderDocument {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id().map(|id| id.get()),
            customer_id: o.customer_id().get(),
            status: o.status().as_str(),
            total_price: o.total_price().to_f64(),
            items_count: o.items_count(),
            created_at: o.created_at().to_rfc3339(),
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, documents: &[T]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(documents)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Writes `products.json`, `customers.json` and `orders.json` into `dir`.
#[tracing::instrument(skip(repo), err)]
pub async fn export_json<R: Repository + ?Sized>(repo: &R, dir: &Path) -> Result<ExportedFiles> {
    tokio::fs::create_dir_all(dir).await?;
    let mut files = ExportedFiles::new();

    let products = repo.get_all_products().await?;
    let path = dir.join("products.json");
    let documents: Vec<ProductDocument<'_>> = products.iter().map(Into::into).collect();
    write_json(&path, &documents).await?;
    files.insert("products", path);

    let customers = repo.get_all_customers().await?;
    let path = dir.join("customers.json");
    let documents: Vec<CustomerDocument<'_>> = customers.iter().map(Into::into).collect();
    write_json(&path, &documents).await?;
    files.insert("customers", path);

    let orders = repo.get_all_orders().await?;
    let path = dir.join("orders.json");
    let documents: Vec<OrderDocument> = orders.iter().map(Into::into).collect();
    write_json(&path, &documents).await?;
    files.insert("orders", path);

    info!(
        products = products.len(),
        customers = customers.len(),
        orders = orders.len(),
        "Exported JSON"
    );
    Ok(files)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProductRow {
    #[serde(rename = "ID", default)]
    _id: Option<String>,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Quantity")]
    quantity: i64,
}

impl ProductRow {
    fn into_product(self) -> std::result::Result<Product, domain::ValidationError> {
        let price: Money = self.price.parse()?;
        Product::create(self.name, price, self.description, self.quantity)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CustomerRow {
    #[serde(rename = "ID", default)]
    _id: Option<String>,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Orders Count", default)]
    _orders_count: Option<String>,
}

/// Reads the file if it exists.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn skip_row(file: &str, line: usize, reason: &dyn std::fmt::Display) {
    warn!(file, line, %reason, "Skipping import row");
    metrics::counter!("store_import_rows_skipped").increment(1);
}

/// Imports `products.csv` and `customers.csv` from `dir`, whichever exist.
///
/// Rows that fail to decode, fail validation or collide with a stored email
/// are skipped and counted. Storage failures abort the import.
#[tracing::instrument(skip(repo), err)]
pub async fn import_csv<R: Repository + ?Sized>(repo: &R, dir: &Path) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    if let Some(bytes) = read_optional(&dir.join("products.csv")).await? {
        let rows: Vec<_> = csv::Reader::from_reader(bytes.as_slice())
            .deserialize::<ProductRow>()
            .collect();
        for (index, row) in rows.into_iter().enumerate() {
            let line = index + 2;
            let product = match row.map(ProductRow::into_product) {
                Ok(Ok(product)) => product,
                Ok(Err(e)) => {
                    skip_row("products.csv", line, &e);
                    report.products_skipped += 1;
                    continue;
                }
                Err(e) => {
                    skip_row("products.csv", line, &e);
                    report.products_skipped += 1;
                    continue;
                }
            };
            repo.add_product(product).await?;
            report.products_imported += 1;
        }
    }

    if let Some(bytes) = read_optional(&dir.join("customers.csv")).await? {
        let rows: Vec<_> = csv::Reader::from_reader(bytes.as_slice())
            .deserialize::<CustomerRow>()
            .collect();
        for (index, row) in rows.into_iter().enumerate() {
            let line = index + 2;
            let customer = match row {
                Ok(row) => Customer::create(row.name, row.email, row.phone, row.address),
                Err(e) => {
                    skip_row("customers.csv", line, &e);
                    report.customers_skipped += 1;
                    continue;
                }
            };
            let customer = match customer {
                Ok(customer) => customer,
                Err(e) => {
                    skip_row("customers.csv", line, &e);
                    report.customers_skipped += 1;
                    continue;
                }
            };
            match repo.add_customer(customer).await {
                Ok(_) => report.customers_imported += 1,
                Err(e @ StoreError::DuplicateEmail { .. }) => {
                    skip_row("customers.csv", line, &e);
                    report.customers_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    info!(?report, "Imported CSV");
    Ok(report)
}
