//! Binding every (menu item, ingredient) pair to a concrete product.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Menu, MenuItem};
use crate::domain::candidates::CandidateResolver;
use crate::domain::catalogue::Product;
use crate::domain::dish::Dish;
use crate::domain::error::{InvalidArgument, PlanningError};
use crate::domain::ids::DishId;
use crate::domain::numeric::NumericConfig;
use crate::domain::ports::{DishRepository, ProductRepository};
use crate::domain::validation::{ensure_positive, non_blank};

/// Caller override choosing candidate `product_index` for one ingredient
/// of one dish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProductConstraintRecord", into = "ProductConstraintRecord")]
pub struct ProductConstraint {
    dish_name: String,
    ingredient_ordinal: usize,
    product_index: usize,
}

impl ProductConstraint {
    /// Select candidate `product_index` for ingredient `ingredient_ordinal`
    /// of the dish named `dish_name`.
    pub fn new(
        dish_name: impl Into<String>,
        ingredient_ordinal: usize,
        product_index: usize,
    ) -> Result<Self, InvalidArgument> {
        Ok(Self {
            dish_name: non_blank(dish_name.into(), "dish_name")?,
            ingredient_ordinal,
            product_index,
        })
    }

    pub fn dish_name(&self) -> &str {
        self.dish_name.as_str()
    }
    pub fn ingredient_ordinal(&self) -> usize {
        self.ingredient_ordinal
    }
    pub fn product_index(&self) -> usize {
        self.product_index
    }

    fn applies_to(&self, dish_name: &str, ingredient_ordinal: usize) -> bool {
        self.ingredient_ordinal == ingredient_ordinal && self.dish_name == dish_name
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ProductConstraintRecord {
    dish_name: String,
    ingredient_ordinal: usize,
    product_index: usize,
}

impl From<ProductConstraint> for ProductConstraintRecord {
    fn from(value: ProductConstraint) -> Self {
        Self {
            dish_name: value.dish_name,
            ingredient_ordinal: value.ingredient_ordinal,
            product_index: value.product_index,
        }
    }
}

impl TryFrom<ProductConstraintRecord> for ProductConstraint {
    type Error = InvalidArgument;

    fn try_from(value: ProductConstraintRecord) -> Result<Self, Self::Error> {
        Self::new(value.dish_name, value.ingredient_ordinal, value.product_index)
    }
}

/// The product selected for one ingredient of one menu item, with the
/// quantity that pair needs. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemProduct {
    pub item: MenuItem,
    pub dish_name: String,
    pub ingredient_ordinal: usize,
    pub product: Product,
    pub necessary_quantity: Decimal,
}

impl Menu {
    /// Resolve a product for every ingredient of every item, in menu order
    /// then ingredient order.
    ///
    /// Each pair uses the last constraint naming its dish and ingredient
    /// ordinal, or candidate 0 when none does. Pairs without any candidate
    /// contribute nothing. The necessary quantity of a pair is
    /// `quantity_per_serving * item.quantity * quantity`, rounded once.
    ///
    /// Repository reads are memoised for the duration of this call only.
    pub async fn menu_item_products<P, D>(
        &self,
        products: &P,
        dishes: &D,
        numeric: &NumericConfig,
        quantity: Decimal,
        constraints: &[ProductConstraint],
    ) -> Result<Vec<MenuItemProduct>, PlanningError>
    where
        P: ProductRepository + ?Sized,
        D: DishRepository + ?Sized,
    {
        let quantity = ensure_positive(quantity, "quantity")?;
        let mut resolver = CandidateResolver::new(products);
        let mut dish_cache: HashMap<DishId, Dish> = HashMap::new();
        let mut resolved = Vec::new();

        for item in &self.items {
            let dish = match dish_cache.entry(item.dish_id()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let dish = dishes
                        .find_by_id(&item.dish_id())
                        .await?
                        .ok_or(PlanningError::DishNotFound {
                            dish_id: item.dish_id(),
                        })?;
                    entry.insert(dish)
                }
            };

            for (ordinal, ingredient) in dish.ingredients().iter().enumerate() {
                let product_index = constraints
                    .iter()
                    .rev()
                    .find(|constraint| constraint.applies_to(dish.name(), ordinal))
                    .map_or(0, ProductConstraint::product_index);

                let Some(product) = resolver.resolve(ingredient.filter(), product_index).await?
                else {
                    debug!(
                        menu_id = %self.id,
                        dish = dish.name(),
                        ingredient = ingredient.name(),
                        "no candidate product; skipping ingredient"
                    );
                    continue;
                };

                let necessary_quantity = numeric.product([
                    ingredient.quantity_per_serving(),
                    item.quantity(),
                    quantity,
                ]);
                resolved.push(MenuItemProduct {
                    item: item.clone(),
                    dish_name: dish.name().to_owned(),
                    ingredient_ordinal: ordinal,
                    product,
                    necessary_quantity,
                });
            }
        }
        Ok(resolved)
    }
}
