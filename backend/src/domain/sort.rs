//! Deterministic orderings over products, dishes and menus.
//!
//! A [`SortSpec`] is a non-empty list of `(field, direction)` keys drawn
//! from an entity-specific whitelist. Comparison falls back to the entity
//! identifier once every key ties, so the resulting order is total.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::InvalidArgument;

/// Closed whitelist of sortable field names for one entity kind.
pub trait SortField:
    Copy
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = InvalidArgument>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Every accepted field.
    const ALL: &'static [Self];

    /// Wire name of the field.
    fn name(self) -> &'static str;
}

/// Value extracted from an entity for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    /// Identifier value.
    Id(Uuid),
    /// Text compared lexicographically.
    Text(&'a str),
    /// Decimal compared numerically.
    Decimal(Decimal),
}

/// An entity that can be ordered by a [`SortSpec`].
pub trait Sortable {
    /// Whitelist of fields the entity exposes.
    type Field: SortField;

    /// Value of `field` for this entity.
    fn sort_value(&self, field: Self::Field) -> SortValue<'_>;

    /// Identifier used as the final tie-breaker.
    fn sort_id(&self) -> Uuid;
}

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl FromStr for Direction {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(InvalidArgument::unknown_value(
                "direction",
                value,
                "asc|ascending|desc|descending",
            )),
        }
    }
}

/// One `(field, direction)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SortKey<F> {
    /// Field compared by this key.
    pub field: F,
    /// Direction applied to the comparison.
    pub direction: Direction,
}

/// Validated, non-empty ordered list of sort keys.
///
/// # Examples
/// ```
/// use menu_planner::domain::{Direction, ProductField, SortSpec};
///
/// let sort = SortSpec::<ProductField>::parse(&[("price", "asc"), ("shop", "desc")])?;
/// assert_eq!(sort.keys()[0].field, ProductField::Price);
/// assert_eq!(sort.keys()[1].direction, Direction::Descending);
/// # Ok::<(), menu_planner::domain::InvalidArgument>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<SortKey<F>>",
    into = "Vec<SortKey<F>>",
    bound = "F: SortField"
)]
pub struct SortSpec<F: SortField> {
    keys: Vec<SortKey<F>>,
}

impl<F: SortField> SortSpec<F> {
    /// Build a sort from ordered keys; rejects an empty list or a field
    /// listed twice.
    pub fn new(keys: Vec<(F, Direction)>) -> Result<Self, InvalidArgument> {
        if keys.is_empty() {
            return Err(InvalidArgument::empty("sort"));
        }
        let mut seen = Vec::with_capacity(keys.len());
        for (field, _) in &keys {
            if seen.contains(field) {
                return Err(InvalidArgument::duplicate("sort", field.name()));
            }
            seen.push(*field);
        }
        Ok(Self {
            keys: keys
                .into_iter()
                .map(|(field, direction)| SortKey { field, direction })
                .collect(),
        })
    }

    /// Build a sort from textual `(field, direction)` pairs.
    pub fn parse(pairs: &[(&str, &str)]) -> Result<Self, InvalidArgument> {
        let keys = pairs
            .iter()
            .map(|(field, direction)| -> Result<(F, Direction), InvalidArgument> {
                Ok((field.parse()?, direction.parse()?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(keys)
    }

    /// Sort by a single field, smallest first.
    pub fn ascending(field: F) -> Self {
        Self {
            keys: vec![SortKey {
                field,
                direction: Direction::Ascending,
            }],
        }
    }

    /// Sort by a single field, largest first.
    pub fn descending(field: F) -> Self {
        Self {
            keys: vec![SortKey {
                field,
                direction: Direction::Descending,
            }],
        }
    }

    /// Keys in priority order.
    pub fn keys(&self) -> &[SortKey<F>] {
        &self.keys
    }

    /// Compare two entities by every key in turn, then by identifier.
    pub fn compare<T>(&self, lhs: &T, rhs: &T) -> Ordering
    where
        T: Sortable<Field = F>,
    {
        self.keys
            .iter()
            .map(|key| {
                let ordering = lhs.sort_value(key.field).cmp(&rhs.sort_value(key.field));
                match key.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| lhs.sort_id().cmp(&rhs.sort_id()))
    }
}

impl<F: SortField> fmt::Display for SortSpec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, key) in self.keys.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            let direction = match key.direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            write!(f, "{} {direction}", key.field)?;
        }
        Ok(())
    }
}

impl<F: SortField> From<SortSpec<F>> for Vec<SortKey<F>> {
    fn from(value: SortSpec<F>) -> Self {
        value.keys
    }
}

impl<F: SortField> TryFrom<Vec<SortKey<F>>> for SortSpec<F> {
    type Error = InvalidArgument;

    fn try_from(value: Vec<SortKey<F>>) -> Result<Self, Self::Error> {
        Self::new(
            value
                .into_iter()
                .map(|key| (key.field, key.direction))
                .collect(),
        )
    }
}

fn parse_field<F: SortField>(raw: &str) -> Result<F, InvalidArgument> {
    let trimmed = raw.trim();
    F::ALL
        .iter()
        .copied()
        .find(|field| field.name() == trimmed)
        .ok_or_else(|| {
            let expected: Vec<&str> = F::ALL.iter().map(|field| field.name()).collect();
            InvalidArgument::unknown_value("sort_field", raw, expected.join("|"))
        })
}

macro_rules! define_sort_fields {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $($(#[$doc:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$doc])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl SortField for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = InvalidArgument;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                parse_field(value)
            }
        }
    };
}

define_sort_fields! {
    /// Sortable product fields.
    pub enum ProductField {
        /// Product identifier.
        Id => "id",
        /// Product category.
        Category => "category",
        /// Selling shop.
        Shop => "shop",
        /// Quality grade.
        Grade => "grade",
        /// Manufacturer name.
        Manufacturer => "manufacturer",
        /// Unit of quantity.
        Unit => "unit",
        /// Price per unit of quantity.
        Price => "price",
        /// Quantity contained in one package.
        PackageSize => "packageSize",
        /// Quantity currently on hand.
        AvailableQuantity => "availableQuantity",
    }
}

define_sort_fields! {
    /// Sortable dish fields.
    pub enum DishField {
        /// Dish identifier.
        Id => "id",
        /// Dish name.
        Name => "name",
        /// Quantity produced by one serving.
        ServingSize => "servingSize",
        /// Unit of the serving size.
        Unit => "unit",
    }
}

define_sort_fields! {
    /// Sortable menu fields.
    pub enum MenuField {
        /// Menu identifier.
        Id => "id",
        /// Menu name.
        Name => "name",
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for sort parsing and comparison.

    use rstest::rstest;

    use super::*;
    use crate::domain::Constraint;

    struct Row {
        id: Uuid,
        shop: &'static str,
        price: Decimal,
    }

    impl Sortable for Row {
        type Field = ProductField;

        fn sort_value(&self, field: ProductField) -> SortValue<'_> {
            match field {
                ProductField::Shop => SortValue::Text(self.shop),
                ProductField::Price => SortValue::Decimal(self.price),
                _ => SortValue::Id(self.id),
            }
        }

        fn sort_id(&self) -> Uuid {
            self.id
        }
    }

    fn row(id: u128, shop: &'static str, price: i64) -> Row {
        Row {
            id: Uuid::from_u128(id),
            shop,
            price: Decimal::new(price, 2),
        }
    }

    #[rstest]
    fn keys_apply_in_priority_order_then_identifier() {
        let sort = SortSpec::new(vec![
            (ProductField::Shop, Direction::Descending),
            (ProductField::Price, Direction::Ascending),
        ])
        .expect("valid sort");
        let mut rows = vec![
            row(4, "a", 100),
            row(3, "b", 250),
            row(2, "b", 100),
            row(1, "b", 100),
        ];
        rows.sort_by(|lhs, rhs| sort.compare(lhs, rhs));
        let order: Vec<u128> = rows.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn empty_sorts_are_rejected() {
        let err = SortSpec::<DishField>::new(Vec::new()).expect_err("empty sort");
        assert_eq!(err, InvalidArgument::empty("sort"));
    }

    #[rstest]
    fn duplicate_fields_are_rejected() {
        let err = SortSpec::new(vec![
            (MenuField::Name, Direction::Ascending),
            (MenuField::Name, Direction::Descending),
        ])
        .expect_err("duplicate field");
        assert_eq!(
            err.constraint(),
            &Constraint::Duplicate {
                value: "name".to_owned()
            }
        );
    }

    #[rstest]
    #[case("colour", "asc", "sort_field")]
    #[case("price", "sideways", "direction")]
    fn unknown_names_are_rejected(
        #[case] field: &str,
        #[case] direction: &str,
        #[case] expected_field: &str,
    ) {
        let err = SortSpec::<ProductField>::parse(&[(field, direction)]).expect_err("unknown");
        assert_eq!(err.field(), expected_field);
        assert!(matches!(err.constraint(), Constraint::UnknownValue { .. }));
    }

    #[rstest]
    fn field_names_are_whitelisted_per_entity() {
        assert!("packageSize".parse::<ProductField>().is_ok());
        assert!("packageSize".parse::<DishField>().is_err());
        assert_eq!(DishField::ServingSize.to_string(), "servingSize");
    }

    #[rstest]
    fn sorts_serialise_as_key_lists() {
        let sort = SortSpec::descending(ProductField::AvailableQuantity);
        let json = serde_json::to_string(&sort).expect("serialise sort");
        assert_eq!(
            json,
            r#"[{"field":"availableQuantity","direction":"descending"}]"#
        );
        let decoded: SortSpec<ProductField> = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(decoded, sort);
        assert!(serde_json::from_str::<SortSpec<ProductField>>("[]").is_err());
    }

    #[rstest]
    fn display_lists_keys() {
        let sort = SortSpec::<ProductField>::parse(&[("price", "ascending"), ("shop", "DESC")])
            .expect("valid sort");
        assert_eq!(sort.to_string(), "price asc, shop desc");
    }
}
