use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a storage-assigned row id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying row id.
            pub fn get(&self) -> i64 {
                self.0
            }

            /// Returns true if this id could have been assigned by storage.
            pub fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identity of a persisted product.
    ProductId
);

entity_id!(
    /// Identity of a persisted customer.
    CustomerId
);

entity_id!(
    /// Identity of a persisted order.
    OrderId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_preserves_value() {
        let id = ProductId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn zero_and_negative_ids_are_not_valid() {
        assert!(!CustomerId::new(0).is_valid());
        assert!(!CustomerId::new(-3).is_valid());
        assert!(CustomerId::new(1).is_valid());
    }

    #[test]
    fn id_serializes_as_plain_integer() {
        let id = OrderId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
