//! Test utilities shared by the unit tests in `src/`.
//!
//! Builders start from valid defaults so each test only spells out the
//! attributes it cares about.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{
    Dish, DishDraft, DishId, DishIngredient, FilterTree, IngredientDraft, IngredientId, Menu,
    MenuDraft, MenuId, MenuItem, MenuItemId, Product, ProductDraft, ProductId, Tag, UserId,
};

/// Parse a decimal literal.
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|err| panic!("invalid decimal {value}: {err}"))
}

/// Build a normalised tag.
pub fn tag(raw: &str) -> Tag {
    Tag::new(raw).unwrap_or_else(|err| panic!("invalid tag {raw}: {err}"))
}

/// Filter selecting products that carry every tag in `tags`.
pub fn tags_filter(tags: &[&str]) -> FilterTree {
    FilterTree::min_tags(tags.iter().map(|raw| tag(raw))).expect("non-empty tag filter")
}

/// Builder for [`Product`] values.
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    draft: ProductDraft,
}

impl ProductBuilder {
    /// Start from a one-unit package costing one per unit, with no stock.
    pub fn new(owner: UserId) -> Self {
        Self {
            draft: ProductDraft {
                id: ProductId::random(),
                owner,
                category: "Groceries".to_owned(),
                shop: "Corner Shop".to_owned(),
                grade: "standard".to_owned(),
                manufacturer: "Acme".to_owned(),
                unit: "kg".to_owned(),
                price: Decimal::ONE,
                package_size: Decimal::ONE,
                available_quantity: Decimal::ZERO,
                tags: BTreeSet::new(),
            },
        }
    }

    pub fn shop(mut self, shop: &str) -> Self {
        self.draft.shop = shop.to_owned();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.draft.category = category.to_owned();
        self
    }

    pub fn price(mut self, price: &str) -> Self {
        self.draft.price = dec(price);
        self
    }

    pub fn package_size(mut self, size: &str) -> Self {
        self.draft.package_size = dec(size);
        self
    }

    pub fn available(mut self, quantity: &str) -> Self {
        self.draft.available_quantity = dec(quantity);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.draft.tags = tags.iter().map(|raw| tag(raw)).collect();
        self
    }

    pub fn build(self) -> Product {
        Product::new(self.draft).expect("valid product")
    }
}

/// Build an ingredient needing `per_serving` of whatever `filter` selects.
pub fn ingredient(name: &str, filter: FilterTree, per_serving: &str) -> DishIngredient {
    DishIngredient::new(IngredientDraft {
        id: IngredientId::random(),
        name: name.to_owned(),
        filter,
        quantity_per_serving: dec(per_serving),
    })
    .expect("valid ingredient")
}

/// Build a dish from its ingredients.
pub fn dish(owner: UserId, name: &str, ingredients: Vec<DishIngredient>) -> Dish {
    Dish::new(DishDraft {
        id: DishId::random(),
        owner,
        name: name.to_owned(),
        serving_size: Decimal::ONE,
        unit: "portion".to_owned(),
        tags: BTreeSet::new(),
        ingredients,
    })
    .expect("valid dish")
}

/// Build a menu serving each `(dish, quantity)` pair in order.
pub fn menu(owner: UserId, name: &str, items: &[(&Dish, &str)]) -> Menu {
    Menu::new(MenuDraft {
        id: MenuId::random(),
        owner,
        name: name.to_owned(),
        tags: BTreeSet::new(),
        items: items
            .iter()
            .map(|(dish, quantity)| {
                MenuItem::new(MenuItemId::random(), dish.id(), dec(quantity)).expect("valid item")
            })
            .collect(),
    })
    .expect("valid menu")
}
