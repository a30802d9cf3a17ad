//! Repository ports: the edge between the planning core and storage.
//!
//! Each entity kind has its own port exposing the same four reads (count,
//! page, projected count and projected page) over a
//! [`crate::domain::FilterTree`]. Pageables are normalised into a
//! [`pagination::PageRequest`] before they reach an adapter. Adapters map
//! their failures into [`RepositoryError`], which the core surfaces to its
//! callers unchanged; retries and timeouts belong to the adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod dish_repository;
mod menu_repository;
mod product_repository;

#[cfg(test)]
pub use dish_repository::MockDishRepository;
pub use dish_repository::{DishRepository, FixtureDishRepository};
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
pub use menu_repository::{FixtureMenuRepository, MenuRepository};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{FixtureProductRepository, ProductRepository};

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum RepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "repository connection failed: {message}",
        /// A read failed during execution or row conversion.
        Query { message: String } =>
            "repository query failed: {message}",
    }
}
