//! Menu planning service.
//!
//! Loads menus and dishes through their repositories and turns them into
//! shopping shortfalls: which product each ingredient resolves to, how much
//! of it the menu needs, and how much of that still has to be bought.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::candidates::CandidateResolver;
use crate::domain::dish::shortfall;
use crate::domain::ports::{DishRepository, MenuRepository, ProductRepository};
use crate::domain::{
    DishId, MenuId, MenuItemProduct, NumericConfig, PlanningError, Product, ProductConstraint,
    ProductGrouping,
};

/// What one product contributes to a menu's shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortfallLine {
    pub product: Product,
    /// Quantity the whole menu needs of this product.
    pub necessary_quantity: Decimal,
    /// Quantity still missing after the available stock is used.
    pub lack_quantity: Decimal,
    pub lack_quantity_price: Decimal,
}

/// Menu-wide shopping shortfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortfallReport {
    pub menu_id: MenuId,
    pub quantity: Decimal,
    /// One line per selected product, in order of first appearance.
    pub lines: Vec<ShortfallLine>,
    /// `None` when no ingredient resolved to a product.
    pub total_lack_price: Option<Decimal>,
}

/// Shortfall of a single dish ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishShortfall {
    pub dish_id: DishId,
    pub ingredient_ordinal: usize,
    pub product: Product,
    pub necessary_quantity: Decimal,
    /// Quantity beyond one package of `product`.
    pub lack_quantity: Decimal,
    pub lack_quantity_price: Decimal,
}

/// Planning service over the three catalogue repositories.
pub struct MenuPlanningService<P: ?Sized, D: ?Sized, M: ?Sized> {
    products: Arc<P>,
    dishes: Arc<D>,
    menus: Arc<M>,
    numeric: NumericConfig,
}

impl<P: ?Sized, D: ?Sized, M: ?Sized> Clone for MenuPlanningService<P, D, M> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            dishes: Arc::clone(&self.dishes),
            menus: Arc::clone(&self.menus),
            numeric: self.numeric,
        }
    }
}

impl<P, D, M> MenuPlanningService<P, D, M>
where
    P: ProductRepository + ?Sized,
    D: DishRepository + ?Sized,
    M: MenuRepository + ?Sized,
{
    /// Create a service that rounds every output with `numeric`.
    pub fn new(products: Arc<P>, dishes: Arc<D>, menus: Arc<M>, numeric: NumericConfig) -> Self {
        Self {
            products,
            dishes,
            menus,
            numeric,
        }
    }

    pub fn numeric(&self) -> &NumericConfig {
        &self.numeric
    }

    /// Resolve every (item, ingredient) pair of the menu `menu_id`.
    pub async fn menu_item_products(
        &self,
        menu_id: &MenuId,
        quantity: Decimal,
        constraints: &[ProductConstraint],
    ) -> Result<Vec<MenuItemProduct>, PlanningError> {
        let menu = self
            .menus
            .find_by_id(menu_id)
            .await?
            .ok_or(PlanningError::MenuNotFound { menu_id: *menu_id })?;
        menu.menu_item_products(
            self.products.as_ref(),
            self.dishes.as_ref(),
            &self.numeric,
            quantity,
            constraints,
        )
        .await
    }

    /// Shopping shortfall for serving the menu `menu_id` `quantity` times.
    pub async fn shortfall_report(
        &self,
        menu_id: &MenuId,
        quantity: Decimal,
        constraints: &[ProductConstraint],
    ) -> Result<ShortfallReport, PlanningError> {
        let pairs = self
            .menu_item_products(menu_id, quantity, constraints)
            .await?;
        let pair_count = pairs.len();
        let grouping = ProductGrouping::from_items(pairs);
        let numeric = &self.numeric;

        let lines: Vec<ShortfallLine> = grouping
            .groups()
            .iter()
            .filter_map(|group| {
                let product = group.product();
                Some(ShortfallLine {
                    necessary_quantity: grouping.necessary_quantity(product, numeric)?,
                    lack_quantity: grouping.lack_quantity(product, numeric)?,
                    lack_quantity_price: grouping.lack_quantity_price(product, numeric)?,
                    product: product.clone(),
                })
            })
            .collect();
        let total_lack_price = grouping.lack_products_price(numeric);

        info!(
            %menu_id,
            %quantity,
            pairs = pair_count,
            products = lines.len(),
            total_lack_price = ?total_lack_price,
            "built shortfall report"
        );
        Ok(ShortfallReport {
            menu_id: *menu_id,
            quantity,
            lines,
            total_lack_price,
        })
    }

    /// Shortfall of ingredient `ingredient_ordinal` of dish `dish_id` for
    /// `serving_number` servings, using candidate `product_index`.
    ///
    /// Returns `Ok(None)` when the ingredient has no candidate product.
    pub async fn dish_shortfall(
        &self,
        dish_id: &DishId,
        ingredient_ordinal: usize,
        product_index: usize,
        serving_number: Decimal,
    ) -> Result<Option<DishShortfall>, PlanningError> {
        let dish = self
            .dishes
            .find_by_id(dish_id)
            .await?
            .ok_or(PlanningError::DishNotFound { dish_id: *dish_id })?;
        let ingredient = dish.ingredient(ingredient_ordinal)?;
        let necessary_quantity = ingredient.necessary_quantity(serving_number, &self.numeric)?;

        let mut resolver = CandidateResolver::new(self.products.as_ref());
        let Some(product) = resolver
            .resolve(ingredient.filter(), product_index)
            .await?
        else {
            debug!(%dish_id, ingredient_ordinal, "no candidate product for ingredient");
            return Ok(None);
        };

        let lack_quantity = shortfall(necessary_quantity, product.package_size(), &self.numeric);
        let lack_quantity_price = self.numeric.mul(lack_quantity, product.price());
        Ok(Some(DishShortfall {
            dish_id: *dish_id,
            ingredient_ordinal,
            product,
            necessary_quantity,
            lack_quantity,
            lack_quantity_price,
        }))
    }
}

#[cfg(test)]
#[path = "planning_service_tests.rs"]
mod tests;
