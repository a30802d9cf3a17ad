//! Outbound adapters implementing domain ports.
//!
//! - **memory**: an in-process catalogue serving the product, dish and menu
//!   repositories, loadable from a JSON document.
//!
//! Adapters translate between storage and domain types. Selection rules and
//! pricing stay in the domain.

pub mod memory;
