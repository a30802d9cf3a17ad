//! Domain primitives, aggregates and planning operations.
//!
//! Purpose: Define strongly typed catalogue entities (products, dishes,
//! menus) and the pure computations over them: candidate product
//! resolution, per-dish shortfalls and menu-wide aggregation. Repository
//! access goes through the traits in [`ports`]; every decimal output is
//! rounded by one [`NumericConfig`].
//!
//! Public surface:
//! - Tag, the identifier newtypes, FilterTree and SortSpec: validated values.
//! - Product, Dish, Menu: catalogue entities built from drafts.
//! - ProductGrouping, MenuItemProduct: menu resolution results.
//! - MenuPlanningService: repository-backed entry point for reports.
//! - InvalidArgument, PlanningError, ErrorCode: failure reporting.

pub mod candidates;
pub mod catalogue;
pub mod dish;
pub mod error;
pub mod filter;
pub mod ids;
pub mod menu;
pub mod numeric;
pub mod planning_service;
pub mod ports;
pub mod sort;
pub mod tag;
mod validation;

pub use self::candidates::{CANDIDATE_BATCH_SIZE, CandidateResolver};
pub use self::catalogue::{
    DishProjection, MenuProjection, Product, ProductDraft, ProductProjection, ProjectedValue,
};
pub use self::dish::{Dish, DishDraft, DishIngredient, IngredientDraft};
pub use self::error::{Constraint, ErrorCode, InvalidArgument, PlanningError};
pub use self::filter::{FilterNode, FilterTree};
pub use self::ids::{DishId, IngredientId, MenuId, MenuItemId, ProductId, UserId};
pub use self::menu::{
    Menu, MenuDraft, MenuItem, MenuItemProduct, ProductConstraint, ProductGroup, ProductGrouping,
};
pub use self::numeric::{DefaultNumericEnv, NumericConfig, NumericEnv, RoundingMode};
pub use self::planning_service::{
    DishShortfall, MenuPlanningService, ShortfallLine, ShortfallReport,
};
pub use self::sort::{
    DishField, Direction, MenuField, ProductField, SortField, SortKey, SortSpec, SortValue,
    Sortable,
};
pub use self::tag::Tag;
