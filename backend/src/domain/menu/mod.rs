//! Menus: ordered dish allocations and their menu-wide shortfall.
//!
//! A menu item refers to its dish by id only; the dish is looked up
//! through a [`crate::domain::ports::DishRepository`] whenever the menu is
//! resolved, because a dish's lifetime is independent of any menu using it.
//! That every referenced dish belongs to the menu's owner is enforced by
//! the repository at save time, not by this type.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalogue::MenuProjection;
use super::error::InvalidArgument;
use super::ids::{DishId, MenuId, MenuItemId, UserId};
use super::sort::{MenuField, SortValue, Sortable};
use super::tag::Tag;
use super::validation::{ensure_positive, non_blank};

mod grouping;
mod resolution;


pub use grouping::{ProductGroup, ProductGrouping};
pub use resolution::{MenuItemProduct, ProductConstraint};

/// A dish allocated to a menu with a serving multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MenuItemRecord", into = "MenuItemRecord")]
pub struct MenuItem {
    id: MenuItemId,
    dish_id: DishId,
    quantity: Decimal,
}

impl MenuItem {
    /// Allocate `quantity` servings of `dish_id`; `quantity` must be
    /// positive.
    pub fn new(id: MenuItemId, dish_id: DishId, quantity: Decimal) -> Result<Self, InvalidArgument> {
        Ok(Self {
            id,
            dish_id,
            quantity: ensure_positive(quantity, "item_quantity")?,
        })
    }

    pub fn id(&self) -> MenuItemId {
        self.id
    }
    pub fn dish_id(&self) -> DishId {
        self.dish_id
    }
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MenuItemRecord {
    id: MenuItemId,
    dish_id: DishId,
    quantity: Decimal,
}

impl From<MenuItem> for MenuItemRecord {
    fn from(value: MenuItem) -> Self {
        Self {
            id: value.id,
            dish_id: value.dish_id,
            quantity: value.quantity,
        }
    }
}

impl TryFrom<MenuItemRecord> for MenuItem {
    type Error = InvalidArgument;

    fn try_from(value: MenuItemRecord) -> Result<Self, Self::Error> {
        Self::new(value.id, value.dish_id, value.quantity)
    }
}

/// Input payload for [`Menu::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct MenuDraft {
    pub id: MenuId,
    pub owner: UserId,
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// An ordered list of dish allocations owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    id: MenuId,
    owner: UserId,
    name: String,
    tags: BTreeSet<Tag>,
    items: Vec<MenuItem>,
}

impl Menu {
    /// Validate and construct a menu.
    pub fn new(draft: MenuDraft) -> Result<Self, InvalidArgument> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> MenuId {
        self.id
    }
    pub fn owner(&self) -> UserId {
        self.owner
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }
    pub fn items(&self) -> &[MenuItem] {
        self.items.as_slice()
    }

    /// Replace the menu name.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), InvalidArgument> {
        self.name = non_blank(name.into(), "menu_name")?;
        Ok(())
    }

    /// Attach a tag; returns `false` when it was already present.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    /// Detach a tag; returns `false` when it was absent.
    pub fn remove_tag(&mut self, tag: &Tag) -> bool {
        self.tags.remove(tag)
    }

    /// Append an item at the end of the menu.
    pub fn push_item(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// Remove the item at `position`, shifting later ones down.
    pub fn remove_item(&mut self, position: usize) -> Result<MenuItem, InvalidArgument> {
        if position >= self.items.len() {
            return Err(InvalidArgument::out_of_range(
                "item_position",
                position,
                self.items.len(),
            ));
        }
        Ok(self.items.remove(position))
    }

    /// Distinct dishes referenced by the items, in first-use order.
    pub fn dish_ids(&self) -> Vec<DishId> {
        let mut seen = BTreeSet::new();
        self.items
            .iter()
            .map(MenuItem::dish_id)
            .filter(|dish_id| seen.insert(*dish_id))
            .collect()
    }

    /// Values this menu contributes to a projection listing.
    pub fn projected_values(&self, target: MenuProjection) -> Vec<&str> {
        match target {
            MenuProjection::Tag => self.tags.iter().map(AsRef::as_ref).collect(),
            MenuProjection::Name => vec![self.name()],
        }
    }
}

impl Sortable for Menu {
    type Field = MenuField;

    fn sort_value(&self, field: MenuField) -> SortValue<'_> {
        match field {
            MenuField::Id => SortValue::Id(*self.id.as_uuid()),
            MenuField::Name => SortValue::Text(self.name()),
        }
    }

    fn sort_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
}

impl TryFrom<MenuDraft> for Menu {
    type Error = InvalidArgument;

    fn try_from(draft: MenuDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: draft.id,
            owner: draft.owner,
            name: non_blank(draft.name, "menu_name")?,
            tags: draft.tags,
            items: draft.items,
        })
    }
}

impl<'de> Deserialize<'de> for Menu {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        MenuDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
