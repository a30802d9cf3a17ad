//! Projection targets and projected values.

use serde::{Deserialize, Serialize};

/// One distinct projected value and the number of entities carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedValue {
    pub value: String,
    pub count: usize,
}

impl ProjectedValue {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Product attributes that can be listed as distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductProjection {
    Tag,
    Category,
    Shop,
    Grade,
    Manufacturer,
    Unit,
}

/// Dish attributes that can be listed as distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DishProjection {
    Tag,
    Name,
    Unit,
    /// Names of the dish's ingredients.
    IngredientName,
}

/// Menu attributes that can be listed as distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuProjection {
    Tag,
    Name,
}
