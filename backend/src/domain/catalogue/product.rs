//! Product entity.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductProjection;
use crate::domain::error::InvalidArgument;
use crate::domain::ids::{ProductId, UserId};
use crate::domain::sort::{ProductField, SortValue, Sortable};
use crate::domain::tag::Tag;
use crate::domain::validation::{ensure_non_negative, ensure_positive, non_blank};

/// Input payload for [`Product::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ProductDraft {
    pub id: ProductId,
    pub owner: UserId,
    pub category: String,
    pub shop: String,
    pub grade: String,
    pub manufacturer: String,
    pub unit: String,
    /// Price of one unit of quantity.
    pub price: Decimal,
    /// Quantity contained in one package.
    pub package_size: Decimal,
    /// Quantity currently on hand.
    pub available_quantity: Decimal,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

/// A product a user can buy to satisfy dish ingredients.
///
/// Text attributes are trimmed and non-blank, `price` and
/// `available_quantity` are never negative and `package_size` is strictly
/// positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    owner: UserId,
    category: String,
    shop: String,
    grade: String,
    manufacturer: String,
    unit: String,
    price: Decimal,
    package_size: Decimal,
    available_quantity: Decimal,
    tags: BTreeSet<Tag>,
}

impl Product {
    /// Validate and construct a product.
    pub fn new(draft: ProductDraft) -> Result<Self, InvalidArgument> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> ProductId {
        self.id
    }
    pub fn owner(&self) -> UserId {
        self.owner
    }
    pub fn category(&self) -> &str {
        self.category.as_str()
    }
    pub fn shop(&self) -> &str {
        self.shop.as_str()
    }
    pub fn grade(&self) -> &str {
        self.grade.as_str()
    }
    pub fn manufacturer(&self) -> &str {
        self.manufacturer.as_str()
    }
    pub fn unit(&self) -> &str {
        self.unit.as_str()
    }
    pub fn price(&self) -> Decimal {
        self.price
    }
    pub fn package_size(&self) -> Decimal {
        self.package_size
    }
    pub fn available_quantity(&self) -> Decimal {
        self.available_quantity
    }
    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Values this product contributes to a projection listing.
    pub fn projected_values(&self, target: ProductProjection) -> Vec<&str> {
        match target {
            ProductProjection::Tag => self.tags.iter().map(AsRef::as_ref).collect(),
            ProductProjection::Category => vec![self.category()],
            ProductProjection::Shop => vec![self.shop()],
            ProductProjection::Grade => vec![self.grade()],
            ProductProjection::Manufacturer => vec![self.manufacturer()],
            ProductProjection::Unit => vec![self.unit()],
        }
    }
}

impl Sortable for Product {
    type Field = ProductField;

    fn sort_value(&self, field: ProductField) -> SortValue<'_> {
        match field {
            ProductField::Id => SortValue::Id(*self.id.as_uuid()),
            ProductField::Category => SortValue::Text(self.category()),
            ProductField::Shop => SortValue::Text(self.shop()),
            ProductField::Grade => SortValue::Text(self.grade()),
            ProductField::Manufacturer => SortValue::Text(self.manufacturer()),
            ProductField::Unit => SortValue::Text(self.unit()),
            ProductField::Price => SortValue::Decimal(self.price),
            ProductField::PackageSize => SortValue::Decimal(self.package_size),
            ProductField::AvailableQuantity => SortValue::Decimal(self.available_quantity),
        }
    }

    fn sort_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
}

impl TryFrom<ProductDraft> for Product {
    type Error = InvalidArgument;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: draft.id,
            owner: draft.owner,
            category: non_blank(draft.category, "category")?,
            shop: non_blank(draft.shop, "shop")?,
            grade: non_blank(draft.grade, "grade")?,
            manufacturer: non_blank(draft.manufacturer, "manufacturer")?,
            unit: non_blank(draft.unit, "unit")?,
            price: ensure_non_negative(draft.price, "price")?,
            package_size: ensure_positive(draft.package_size, "package_size")?,
            available_quantity: ensure_non_negative(
                draft.available_quantity,
                "available_quantity",
            )?,
            tags: draft.tags,
        })
    }
}

impl From<Product> for ProductDraft {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            owner: value.owner,
            category: value.category,
            shop: value.shop,
            grade: value.grade,
            manufacturer: value.manufacturer,
            unit: value.unit,
            price: value.price,
            package_size: value.package_size,
            available_quantity: value.available_quantity,
            tags: value.tags,
        }
    }
}

impl<'de> Deserialize<'de> for Product {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ProductDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
