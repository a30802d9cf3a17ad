//! Dish ingredient entity and its quantity arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::candidates::CandidateResolver;
use crate::domain::catalogue::Product;
use crate::domain::error::{InvalidArgument, PlanningError};
use crate::domain::filter::FilterTree;
use crate::domain::ids::IngredientId;
use crate::domain::numeric::NumericConfig;
use crate::domain::ports::ProductRepository;
use crate::domain::validation::{ensure_positive, non_blank};

/// Input payload for [`DishIngredient::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct IngredientDraft {
    pub id: IngredientId,
    pub name: String,
    /// Selects the products that can satisfy the ingredient.
    pub filter: FilterTree,
    pub quantity_per_serving: Decimal,
}

/// A named requirement inside a dish.
///
/// The filter selects acceptable products; the per-serving quantity is
/// scaled by the serving number when computing how much is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishIngredient {
    id: IngredientId,
    name: String,
    filter: FilterTree,
    quantity_per_serving: Decimal,
}

impl DishIngredient {
    /// Validate and construct an ingredient.
    pub fn new(draft: IngredientDraft) -> Result<Self, InvalidArgument> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> IngredientId {
        self.id
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn filter(&self) -> &FilterTree {
        &self.filter
    }
    pub fn quantity_per_serving(&self) -> Decimal {
        self.quantity_per_serving
    }

    /// Quantity needed for `serving_number` servings, rounded.
    ///
    /// # Examples
    /// ```
    /// use menu_planner::domain::{
    ///     DishIngredient, FilterTree, IngredientDraft, IngredientId, NumericConfig, Tag,
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let flour = DishIngredient::new(IngredientDraft {
    ///     id: IngredientId::random(),
    ///     name: "flour".to_owned(),
    ///     filter: FilterTree::min_tags([Tag::new("flour")?])?,
    ///     quantity_per_serving: Decimal::new(10, 0),
    /// })?;
    /// let need = flour.necessary_quantity(Decimal::new(17, 1), &NumericConfig::default())?;
    /// assert_eq!(need.to_string(), "17.000000");
    /// # Ok::<(), menu_planner::domain::InvalidArgument>(())
    /// ```
    pub fn necessary_quantity(
        &self,
        serving_number: Decimal,
        numeric: &NumericConfig,
    ) -> Result<Decimal, InvalidArgument> {
        let servings = ensure_positive(serving_number, "serving_number")?;
        Ok(numeric.mul(self.quantity_per_serving, servings))
    }

    /// The product at `ordinal_index` among this ingredient's candidates,
    /// cheapest first, clamped to the last candidate.
    ///
    /// Returns `Ok(None)` when no product matches the filter.
    pub async fn resolve_candidate<P>(
        &self,
        products: &P,
        ordinal_index: usize,
    ) -> Result<Option<Product>, PlanningError>
    where
        P: ProductRepository + ?Sized,
    {
        CandidateResolver::new(products)
            .resolve(&self.filter, ordinal_index)
            .await
    }
}

impl TryFrom<IngredientDraft> for DishIngredient {
    type Error = InvalidArgument;

    fn try_from(draft: IngredientDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: draft.id,
            name: non_blank(draft.name, "ingredient_name")?,
            filter: draft.filter,
            quantity_per_serving: ensure_positive(
                draft.quantity_per_serving,
                "quantity_per_serving",
            )?,
        })
    }
}

impl From<DishIngredient> for IngredientDraft {
    fn from(value: DishIngredient) -> Self {
        Self {
            id: value.id,
            name: value.name,
            filter: value.filter,
            quantity_per_serving: value.quantity_per_serving,
        }
    }
}

impl<'de> Deserialize<'de> for DishIngredient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        IngredientDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// Part of `need` that `covered` does not cover, never negative.
pub(crate) fn shortfall(need: Decimal, covered: Decimal, numeric: &NumericConfig) -> Decimal {
    numeric.round(need.saturating_sub(covered).max(Decimal::ZERO))
}
