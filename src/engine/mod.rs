pub mod bridge;
pub mod conform;
pub mod expression;
pub mod registry;
pub mod render;
