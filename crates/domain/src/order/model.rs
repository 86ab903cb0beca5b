//! Order entity.

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId};

use crate::entity::Entity;
use crate::error::ValidationError;
use crate::money::Money;
use crate::product::Product;

use super::{LineItem, OrderStatus};

/// A customer order.
///
/// Line items are kept in insertion order; the same product may appear in
/// several independent lines. `total_price` is recomputed from the items
/// after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Option<OrderId>,
    customer_id: CustomerId,
    items: Vec<LineItem>,
    status: OrderStatus,
    total_price: Money,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order with no items.
    pub fn create(customer_id: CustomerId) -> Result<Self, ValidationError> {
        if !customer_id.is_valid() {
            return Err(ValidationError::CustomerIdRequired);
        }

        Ok(Self {
            id: None,
            customer_id,
            items: Vec::new(),
            status: OrderStatus::Pending,
            total_price: Money::zero(),
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a persisted order from its header and joined line items.
    pub fn restore(
        id: OrderId,
        customer_id: CustomerId,
        status: OrderStatus,
        items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut order = Self {
            id: Some(id),
            customer_id,
            items,
            status,
            total_price: Money::zero(),
            created_at,
        };
        order.recompute_total();
        order
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the sum of `price * quantity` over the current items.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the sum of quantities across all line items.
    pub fn items_count(&self) -> i64 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    /// Appends a line item and updates the total.
    ///
    /// Fails with `InvalidQuantity` if the line or the new total overflows;
    /// the order is left unchanged.
    pub fn add_item(&mut self, product: Product, quantity: i64) -> Result<(), ValidationError> {
        let item = LineItem::new(product, quantity)?;
        let total = self
            .total_price
            .checked_add(item.subtotal())
            .ok_or(ValidationError::InvalidQuantity { quantity })?;
        self.items.push(item);
        self.total_price = total;
        Ok(())
    }

    /// Removes every line referencing `product_id`. A missing product is a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items
            .retain(|item| item.product_id() != Some(product_id));
        self.recompute_total();
    }

    /// Sets the status from its lowercase name.
    pub fn set_status(&mut self, status: &str) -> Result<(), ValidationError> {
        self.status = status.parse()?;
        Ok(())
    }

    fn recompute_total(&mut self) {
        self.total_price = self.items.iter().map(LineItem::subtotal).sum();
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn entity_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> Option<OrderId> {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: i64, price_major: i64) -> Product {
        Product::restore(
            ProductId::new(id),
            format!("Product {id}"),
            Money::from_major(price_major),
            "",
            100,
            Utc::now(),
        )
        .unwrap()
    }

    fn new_order() -> Order {
        Order::create(CustomerId::new(1)).unwrap()
    }

    #[test]
    fn test_new_order_is_pending_and_empty() {
        let order = new_order();
        assert_eq!(order.id(), None);
        assert_eq!(order.customer_id(), CustomerId::new(1));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.items().is_empty());
        assert!(order.total_price().is_zero());
        assert_eq!(order.items_count(), 0);
    }

    #[test]
    fn test_create_requires_customer() {
        assert_eq!(
            Order::create(CustomerId::new(0)).unwrap_err(),
            ValidationError::CustomerIdRequired
        );
    }

    #[test]
    fn test_two_products_total_and_count() {
        let mut order = new_order();
        order.add_item(product(1, 1000), 2).unwrap();
        order.add_item(product(2, 2000), 1).unwrap();

        assert_eq!(order.total_price(), Money::from_major(4000));
        assert_eq!(order.items_count(), 3);
    }

    #[test]
    fn test_add_item_rejects_bad_quantity() {
        let mut order = new_order();
        order.add_item(product(1, 10), 1).unwrap();

        let err = order.add_item(product(2, 10), 0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidQuantity { quantity: 0 });
        assert!(order.add_item(product(2, 10), -1).is_err());

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.total_price(), Money::from_major(10));
    }

    #[test]
    fn test_duplicate_products_are_separate_lines() {
        let mut order = new_order();
        order.add_item(product(1, 5), 1).unwrap();
        order.add_item(product(1, 5), 2).unwrap();

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items_count(), 3);
        assert_eq!(order.total_price(), Money::from_major(15));
    }

    #[test]
    fn test_remove_item_drops_all_lines_for_product() {
        let mut order = new_order();
        order.add_item(product(1, 5), 1).unwrap();
        order.add_item(product(2, 7), 1).unwrap();
        order.add_item(product(1, 5), 4).unwrap();

        order.remove_item(ProductId::new(1));

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].product_id(), Some(ProductId::new(2)));
        assert_eq!(order.total_price(), Money::from_major(7));
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut order = new_order();
        order.add_item(product(1, 5), 1).unwrap();
        order.remove_item(ProductId::new(99));
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.total_price(), Money::from_major(5));
    }

    #[test]
    fn test_set_status() {
        let mut order = new_order();
        order.set_status("shipped").unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);

        let err = order.set_status("lost").unwrap_err();
        assert_eq!(err, ValidationError::InvalidStatus("lost".to_string()));
        assert_eq!(order.status(), OrderStatus::Shipped);
    }

    #[test]
    fn test_add_item_rejects_overflowing_line() {
        let mut order = new_order();
        order.add_item(product(1, 2), 1).unwrap();
        let before = order.clone();

        let cheap = Product::create("Cheap", Money::from_cents(200), "", 0).unwrap();
        let quantity = i64::MAX / 2 + 1;
        assert_eq!(
            order.add_item(cheap, quantity).unwrap_err(),
            ValidationError::InvalidQuantity { quantity }
        );
        assert_eq!(order, before);
    }

    #[test]
    fn test_add_item_rejects_overflowing_total() {
        let mut order = new_order();
        let unit = Product::create("Unit", Money::from_cents(1), "", 0).unwrap();
        order.add_item(unit.clone(), i64::MAX - 10).unwrap();
        let before = order.clone();

        assert_eq!(
            order.add_item(unit.clone(), 11).unwrap_err(),
            ValidationError::InvalidQuantity { quantity: 11 }
        );
        assert_eq!(order, before);

        order.add_item(unit, 10).unwrap();
        assert_eq!(order.total_price(), Money::from_cents(i64::MAX));
        assert_eq!(order.items_count(), i64::MAX);
    }

    #[test]
    fn test_restore_recomputes_total() {
        let items = vec![
            LineItem::new(product(1, 3), 2).unwrap(),
            LineItem::new(product(2, 4), 1).unwrap(),
        ];
        let order = Order::restore(
            OrderId::new(5),
            CustomerId::new(2),
            OrderStatus::Delivered,
            items,
            Utc::now(),
        );
        assert_eq!(order.id(), Some(OrderId::new(5)));
        assert_eq!(order.total_price(), Money::from_major(10));
    }

    #[derive(Debug, Clone)]
    enum Mutation {
        Add { product: i64, quantity: i64 },
        Remove { product: i64 },
    }

    fn mutation() -> impl Strategy<Value = Mutation> {
        prop_oneof![
            (1i64..6, -2i64..10).prop_map(|(product, quantity)| Mutation::Add { product, quantity }),
            (1i64..6).prop_map(|product| Mutation::Remove { product }),
        ]
    }

    proptest! {
        #[test]
        fn total_always_matches_items(mutations in proptest::collection::vec(mutation(), 0..50)) {
            let mut order = new_order();
            for m in mutations {
                match m {
                    Mutation::Add { product: id, quantity } => {
                        let _ = order.add_item(product(id, id * 100 + 1), quantity);
                    }
                    Mutation::Remove { product } => order.remove_item(ProductId::new(product)),
                }
                let expected: i64 = order
                    .items()
                    .iter()
                    .map(|item| item.product().price().cents() * item.quantity())
                    .sum();
                prop_assert_eq!(order.total_price().cents(), expected);
            }
        }
    }
}
