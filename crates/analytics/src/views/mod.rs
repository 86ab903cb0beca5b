//! Reporting views.

pub mod sales_by_date;
pub mod status_distribution;
pub mod summary;
pub mod top_customers;
pub mod top_products;

pub use sales_by_date::{DailySales, SalesByDate};
pub use status_distribution::{StatusCount, StatusDistribution};
pub use summary::SummaryStatistics;
pub use top_customers::{CustomerRank, TopCustomers};
pub use top_products::{ProductSales, TopProducts};
