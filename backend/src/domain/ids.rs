//! Stable entity identifiers.
//!
//! Every identifier is a UUID newtype that serialises as its hyphenated
//! string form. Parsing rejects blank or whitespace-padded input.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::InvalidArgument;

macro_rules! define_entity_id {
    (
        $(#[$outer:meta])*
        pub struct $name:ident => $field:literal;
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and construct the identifier from its textual form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidArgument> {
                parse_uuid(id.as_ref(), $field).map(Self)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidArgument;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

fn parse_uuid(raw: &str, field: &'static str) -> Result<Uuid, InvalidArgument> {
    if raw.trim().is_empty() {
        return Err(InvalidArgument::blank(field));
    }
    if raw.trim() != raw {
        return Err(InvalidArgument::unknown_value(field, raw, "an unpadded UUID"));
    }
    Uuid::parse_str(raw).map_err(|_| InvalidArgument::unknown_value(field, raw, "a UUID"))
}

define_entity_id! {
    /// Owner of products, dishes and menus.
    pub struct UserId => "user_id";
}

define_entity_id! {
    /// Identifier of a purchasable product.
    pub struct ProductId => "product_id";
}

define_entity_id! {
    /// Identifier of a dish.
    pub struct DishId => "dish_id";
}

define_entity_id! {
    /// Identifier of an ingredient inside a dish.
    pub struct IngredientId => "ingredient_id";
}

define_entity_id! {
    /// Identifier of a menu.
    pub struct MenuId => "menu_id";
}

define_entity_id! {
    /// Identifier of an item inside a menu.
    pub struct MenuItemId => "menu_item_id";
}
