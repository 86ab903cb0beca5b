//! Customer entity with contact validation.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use common::CustomerId;
use regex::Regex;

use crate::entity::Entity;
use crate::error::ValidationError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Optional '+', first digit 1-9, 9 to 15 digits total.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{8,14}$").expect("valid phone regex"));

/// A store customer.
///
/// Email uniqueness is enforced by the repository, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: Option<CustomerId>,
    name: String,
    email: String,
    phone: String,
    address: String,
    orders_count: i64,
    created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new transient customer.
    ///
    /// The email is checked first, then the phone.
    pub fn create(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        let phone = phone.into();
        if !PHONE_PATTERN.is_match(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self {
            id: None,
            name: name.into(),
            email,
            phone,
            address: address.into(),
            orders_count: 0,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a persisted customer from stored fields.
    pub fn restore(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        orders_count: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut customer = Self::create(name, email, phone, address)?;
        customer.id = Some(id);
        customer.orders_count = orders_count;
        customer.created_at = created_at;
        Ok(customer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the number of orders this customer has ever placed.
    pub fn orders_count(&self) -> i64 {
        self.orders_count
    }

    /// Records one more placed order. Never decremented.
    pub fn increment_orders(&mut self) {
        self.orders_count += 1;
    }

    /// Replaces the delivery address.
    pub fn update_address(&mut self, new_address: impl Into<String>) {
        self.address = new_address.into();
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn entity_type() -> &'static str {
        "Customer"
    }

    fn id(&self) -> Option<CustomerId> {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
