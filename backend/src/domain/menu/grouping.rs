//! Menu-wide aggregation of resolved pairs by selected product.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::MenuItemProduct;
use crate::domain::catalogue::Product;
use crate::domain::dish::shortfall;
use crate::domain::ids::ProductId;
use crate::domain::numeric::NumericConfig;

/// Every resolved pair that selected one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroup {
    product: Product,
    items: Vec<MenuItemProduct>,
}

impl ProductGroup {
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Pairs in the order they were resolved.
    pub fn items(&self) -> &[MenuItemProduct] {
        self.items.as_slice()
    }
}

/// Resolved pairs grouped by selected product identity.
///
/// Groups keep the order in which their product first appeared; pairs
/// keep their resolution order inside each group.
///
/// # Examples
/// ```
/// use menu_planner::domain::{NumericConfig, ProductGrouping};
///
/// let grouping = ProductGrouping::from_items(Vec::new());
/// assert!(grouping.is_empty());
/// assert_eq!(grouping.lack_products_price(&NumericConfig::default()), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGrouping {
    groups: Vec<ProductGroup>,
    #[serde(skip)]
    positions: HashMap<ProductId, usize>,
}

impl ProductGrouping {
    /// Group `items` by the id of their selected product.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = MenuItemProduct>,
    {
        let mut grouping = Self::default();
        for item in items {
            grouping.push(item);
        }
        grouping
    }

    fn push(&mut self, item: MenuItemProduct) {
        let product_id = item.product.id();
        if let Some(group) = self
            .positions
            .get(&product_id)
            .and_then(|position| self.groups.get_mut(*position))
        {
            group.items.push(item);
            return;
        }
        self.positions.insert(product_id, self.groups.len());
        self.groups.push(ProductGroup {
            product: item.product.clone(),
            items: vec![item],
        });
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Groups in first-appearance order.
    pub fn groups(&self) -> &[ProductGroup] {
        self.groups.as_slice()
    }

    /// The group for `product_id`, if any pair selected it.
    pub fn group(&self, product_id: &ProductId) -> Option<&ProductGroup> {
        self.positions
            .get(product_id)
            .and_then(|position| self.groups.get(*position))
    }

    /// Total quantity of `product` needed across the menu; `None` when no
    /// pair selected it.
    pub fn necessary_quantity(&self, product: &Product, numeric: &NumericConfig) -> Option<Decimal> {
        let group = self.group(&product.id())?;
        Some(numeric.sum(group.items.iter().map(|item| item.necessary_quantity)))
    }

    /// Quantity of `product` still to buy after using what is on hand.
    pub fn lack_quantity(&self, product: &Product, numeric: &NumericConfig) -> Option<Decimal> {
        let total = self.necessary_quantity(product, numeric)?;
        Some(shortfall(total, product.available_quantity(), numeric))
    }

    /// Price of [`Self::lack_quantity`] at `product`'s unit price.
    pub fn lack_quantity_price(&self, product: &Product, numeric: &NumericConfig) -> Option<Decimal> {
        let lack = self.lack_quantity(product, numeric)?;
        Some(numeric.mul(lack, product.price()))
    }

    /// Sum of [`Self::lack_quantity_price`] over every grouped product;
    /// `None` when the grouping is empty.
    pub fn lack_products_price(&self, numeric: &NumericConfig) -> Option<Decimal> {
        if self.is_empty() {
            return None;
        }
        let prices = self
            .groups
            .iter()
            .filter_map(|group| self.lack_quantity_price(&group.product, numeric));
        Some(numeric.sum(prices))
    }
}
