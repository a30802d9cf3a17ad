//! Dishes: ordered ingredient lists and their per-ingredient shortfalls.
//!
//! A dish owns its ingredients. The position of an ingredient in the list
//! is its ordinal, which selection constraints and the shortfall
//! operations use to address it, so the list only changes through the
//! dish's own mutation methods.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalogue::{DishProjection, Product};
use super::error::{InvalidArgument, PlanningError};
use super::ids::{DishId, UserId};
use super::numeric::NumericConfig;
use super::ports::ProductRepository;
use super::sort::{DishField, SortValue, Sortable};
use super::tag::Tag;
use super::validation::{ensure_positive, non_blank};

mod ingredient;


pub use ingredient::{DishIngredient, IngredientDraft};
pub(crate) use ingredient::shortfall;

/// Input payload for [`Dish::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct DishDraft {
    pub id: DishId,
    pub owner: UserId,
    pub name: String,
    /// Quantity one serving produces, in `unit`.
    pub serving_size: Decimal,
    pub unit: String,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub ingredients: Vec<DishIngredient>,
}

/// A recipe owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    id: DishId,
    owner: UserId,
    name: String,
    serving_size: Decimal,
    unit: String,
    tags: BTreeSet<Tag>,
    ingredients: Vec<DishIngredient>,
}

impl Dish {
    /// Validate and construct a dish.
    pub fn new(draft: DishDraft) -> Result<Self, InvalidArgument> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> DishId {
        self.id
    }
    pub fn owner(&self) -> UserId {
        self.owner
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn serving_size(&self) -> Decimal {
        self.serving_size
    }
    pub fn unit(&self) -> &str {
        self.unit.as_str()
    }
    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }
    pub fn ingredients(&self) -> &[DishIngredient] {
        self.ingredients.as_slice()
    }

    /// Ingredient at `ordinal`, or an out-of-range error.
    pub fn ingredient(&self, ordinal: usize) -> Result<&DishIngredient, InvalidArgument> {
        self.ingredients.get(ordinal).ok_or_else(|| {
            InvalidArgument::out_of_range("ingredient_ordinal", ordinal, self.ingredients.len())
        })
    }

    /// Replace the dish name.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), InvalidArgument> {
        self.name = non_blank(name.into(), "dish_name")?;
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

    /// Append an ingredient; it takes the next ordinal.
    pub fn push_ingredient(&mut self, ingredient: DishIngredient) {
        self.ingredients.push(ingredient);
    }

    /// Remove the ingredient at `ordinal`, shifting later ones down.
    pub fn remove_ingredient(&mut self, ordinal: usize) -> Result<DishIngredient, InvalidArgument> {
        self.ingredient(ordinal)?;
        Ok(self.ingredients.remove(ordinal))
    }

    /// Swap the ingredient at `ordinal`, returning the previous one.
    pub fn replace_ingredient(
        &mut self,
        ordinal: usize,
        ingredient: DishIngredient,
    ) -> Result<DishIngredient, InvalidArgument> {
        let len = self.ingredients.len();
        let slot = self
            .ingredients
            .get_mut(ordinal)
            .ok_or_else(|| InvalidArgument::out_of_range("ingredient_ordinal", ordinal, len))?;
        Ok(std::mem::replace(slot, ingredient))
    }

    /// Values this dish contributes to a projection listing.
    pub fn projected_values(&self, target: DishProjection) -> Vec<&str> {
        match target {
            DishProjection::Tag => self.tags.iter().map(AsRef::as_ref).collect(),
            DishProjection::Name => vec![self.name()],
            DishProjection::Unit => vec![self.unit()],
            DishProjection::IngredientName => {
                let names: BTreeSet<&str> = self.ingredients.iter().map(DishIngredient::name).collect();
                names.into_iter().collect()
            }
        }
    }

    /// Candidate product `product_index` for the ingredient at
    /// `ingredient_ordinal`.
    pub async fn product<P>(
        &self,
        products: &P,
        ingredient_ordinal: usize,
        product_index: usize,
    ) -> Result<Option<Product>, PlanningError>
    where
        P: ProductRepository + ?Sized,
    {
        self.ingredient(ingredient_ordinal)?
            .resolve_candidate(products, product_index)
            .await
    }

    /// How much more than one package of the selected product is needed
    /// for `serving_number` servings; `None` without a candidate.
    pub async fn lack_quantity<P>(
        &self,
        products: &P,
        numeric: &NumericConfig,
        ingredient_ordinal: usize,
        product_index: usize,
        serving_number: Decimal,
    ) -> Result<Option<Decimal>, PlanningError>
    where
        P: ProductRepository + ?Sized,
    {
        let lack = self
            .package_shortfall(products, numeric, ingredient_ordinal, product_index, serving_number)
            .await?;
        Ok(lack.map(|(_, lack)| lack))
    }

    /// Price of [`Self::lack_quantity`] at the selected product's unit
    /// price, rounded; `None` without a candidate.
    pub async fn lack_quantity_price<P>(
        &self,
        products: &P,
        numeric: &NumericConfig,
        ingredient_ordinal: usize,
        product_index: usize,
        serving_number: Decimal,
    ) -> Result<Option<Decimal>, PlanningError>
    where
        P: ProductRepository + ?Sized,
    {
        let lack = self
            .package_shortfall(products, numeric, ingredient_ordinal, product_index, serving_number)
            .await?;
        Ok(lack.map(|(product, lack)| numeric.mul(lack, product.price())))
    }

    async fn package_shortfall<P>(
        &self,
        products: &P,
        numeric: &NumericConfig,
        ingredient_ordinal: usize,
        product_index: usize,
        serving_number: Decimal,
    ) -> Result<Option<(Product, Decimal)>, PlanningError>
    where
        P: ProductRepository + ?Sized,
    {
        let ingredient = self.ingredient(ingredient_ordinal)?;
        let need = ingredient.necessary_quantity(serving_number, numeric)?;
        let Some(product) = ingredient.resolve_candidate(products, product_index).await? else {
            return Ok(None);
        };
        let lack = shortfall(need, product.package_size(), numeric);
        Ok(Some((product, lack)))
    }
}

impl Sortable for Dish {
    type Field = DishField;

    fn sort_value(&self, field: DishField) -> SortValue<'_> {
        match field {
            DishField::Id => SortValue::Id(*self.id.as_uuid()),
            DishField::Name => SortValue::Text(self.name()),
            DishField::ServingSize => SortValue::Decimal(self.serving_size),
            DishField::Unit => SortValue::Text(self.unit()),
        }
    }

    fn sort_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
}

impl TryFrom<DishDraft> for Dish {
    type Error = InvalidArgument;

    fn try_from(draft: DishDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: draft.id,
            owner: draft.owner,
            name: non_blank(draft.name, "dish_name")?,
            serving_size: ensure_positive(draft.serving_size, "serving_size")?,
            unit: non_blank(draft.unit, "unit")?,
            tags: draft.tags,
            ingredients: draft.ingredients,
        })
    }
}

impl<'de> Deserialize<'de> for Dish {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        DishDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
