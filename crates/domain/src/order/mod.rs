//! Order entity and related types.

mod line_item;
mod model;
mod status;

pub use line_item::LineItem;
pub use model::Order;
pub use status::OrderStatus;
