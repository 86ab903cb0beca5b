//! Reporting views for the store catalog.
//!
//! This crate provides the read-only side of the system:
//! - [`Report`] trait shared by every view
//! - [`AnalyticsEngine`] for building views from a [`store::Repository`]
//! - Five views: sales by date, top customers, top products, status
//!   distribution and summary statistics
//!
//! Each view is a plain value built by a pure constructor, so the engine is
//! only responsible for fetching data. No view ever fails on empty input.

pub mod engine;
pub mod error;
pub mod report;
pub mod views;

pub use engine::AnalyticsEngine;
pub use error::{AnalyticsError, Result};
pub use report::Report;
pub use views::{
    CustomerRank, DailySales, ProductSales, SalesByDate, StatusCount, StatusDistribution,
    SummaryStatistics, TopCustomers, TopProducts,
};
