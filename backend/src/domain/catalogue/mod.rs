//! Purchasable products and the projections repositories list.
//!
//! Products are owned by a user and selected by dish ingredients through a
//! [`crate::domain::FilterTree`]. Projections list distinct attribute values
//! (tags, names, units and so on) alongside the number of entities that
//! carry each value.

mod product;
mod projection;


pub use product::{Product, ProductDraft};
pub use projection::{DishProjection, MenuProjection, ProductProjection, ProjectedValue};
