//! Immutable predicate trees selecting products, dishes and menus.
//!
//! A [`FilterTree`] is a validated value: constructors check their operands
//! eagerly and every tree is structurally comparable. `And`/`Or` operands
//! are kept in a canonical order so two trees built from the same operands
//! in different orders are equal and hash alike. `OrElse` keeps its operand
//! order because it is semantically significant: the primary result set is
//! used when it is non-empty, otherwise the fallback set is used. The two
//! sets are never merged.
//!
//! Consumers (repository adapters, the candidate resolver) match
//! exhaustively on [`FilterNode`], so a new predicate kind is a
//! compile-time-checked change.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Constraint, InvalidArgument};
use super::ids::UserId;
use super::tag::Tag;

mod dto;

use dto::FilterTreeDto;

/// Minimum number of operands accepted by `And` and `Or`.
pub const MIN_OPERANDS: usize = 2;

/// One predicate kind and its operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterNode {
    /// Entity belongs to the given user.
    ByUser(UserId),
    /// Product category is one of the values.
    AnyCategory(BTreeSet<String>),
    /// Product shop is one of the values.
    AnyShop(BTreeSet<String>),
    /// Product grade is one of the values.
    AnyGrade(BTreeSet<String>),
    /// Product manufacturer is one of the values.
    AnyManufacturer(BTreeSet<String>),
    /// Dish has an ingredient named by one of the values.
    AnyIngredient(BTreeSet<String>),
    /// Dish is named by one of the values, or menu contains such a dish.
    AnyDish(BTreeSet<String>),
    /// Menu is named by one of the values, or dish is used by such a menu.
    AnyMenu(BTreeSet<String>),
    /// Entity carries every listed tag.
    MinTags(BTreeSet<Tag>),
    /// Every operand matches.
    And(Vec<FilterTree>),
    /// At least one operand matches.
    Or(Vec<FilterTree>),
    /// The primary result set when non-empty, otherwise the fallback set.
    OrElse {
        /// Preferred predicate.
        primary: Box<FilterTree>,
        /// Predicate used only when the primary selects nothing.
        fallback: Box<FilterTree>,
    },
}

/// Validated, immutable predicate expression.
///
/// # Examples
/// ```
/// use menu_planner::domain::{FilterTree, Tag};
///
/// let exact = FilterTree::and([
///     FilterTree::any_shop(["Corner Shop"])?,
///     FilterTree::min_tags([Tag::new("whole milk")?])?,
/// ])?;
/// let loose = FilterTree::min_tags([Tag::new("milk")?])?;
/// let filter = FilterTree::or_else(exact, loose);
/// assert_eq!(filter.alternatives().len(), 2);
/// # Ok::<(), menu_planner::domain::InvalidArgument>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "FilterTreeDto", into = "FilterTreeDto")]
pub struct FilterTree(FilterNode);

impl FilterTree {
    /// Select entities owned by `user`.
    pub fn by_user(user: UserId) -> Self {
        Self(FilterNode::ByUser(user))
    }

    /// Select products whose category is one of `values`.
    pub fn any_category<I, S>(values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("category", values).map(|set| Self(FilterNode::AnyCategory(set)))
    }

    /// Select products sold by one of `values`.
    pub fn any_shop<I, S>(values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("shop", values).map(|set| Self(FilterNode::AnyShop(set)))
    }

    /// Select products whose grade is one of `values`.
    pub fn any_grade<I, S>(values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("grade", values).map(|set| Self(FilterNode::AnyGrade(set)))
    }

    /// Select products made by one of `values`.
    pub fn any_manufacturer<I, S>(values: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("manufacturer", values).map(|set| Self(FilterNode::AnyManufacturer(set)))
    }

    /// Select dishes with an ingredient named by one of `names`.
    pub fn any_ingredient<I, S>(names: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("ingredient_names", names).map(|set| Self(FilterNode::AnyIngredient(set)))
    }

    /// Select dishes named by one of `names`, or menus containing one.
    pub fn any_dish<I, S>(names: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("dish_names", names).map(|set| Self(FilterNode::AnyDish(set)))
    }

    /// Select menus named by one of `names`, or dishes used by one.
    pub fn any_menu<I, S>(names: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        value_set("menu_names", names).map(|set| Self(FilterNode::AnyMenu(set)))
    }

    /// Select entities carrying every tag in `tags`.
    pub fn min_tags<I>(tags: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = Tag>,
    {
        let set: BTreeSet<Tag> = tags.into_iter().collect();
        if set.is_empty() {
            return Err(InvalidArgument::empty("tags"));
        }
        Ok(Self(FilterNode::MinTags(set)))
    }

    /// Select entities matched by every operand.
    pub fn and<I>(operands: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = FilterTree>,
    {
        canonical_operands("and", operands).map(|children| Self(FilterNode::And(children)))
    }

    /// Select entities matched by at least one operand.
    pub fn or<I>(operands: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = FilterTree>,
    {
        canonical_operands("or", operands).map(|children| Self(FilterNode::Or(children)))
    }

    /// Prefer `primary`; use `fallback` only when `primary` selects nothing.
    pub fn or_else(primary: FilterTree, fallback: FilterTree) -> Self {
        Self(FilterNode::OrElse {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        })
    }

    /// The predicate kind at the root of this tree.
    pub fn node(&self) -> &FilterNode {
        &self.0
    }

    /// Rewrite this tree as the ordered alternatives its `OrElse` nodes
    /// stand for, most preferred first.
    ///
    /// `OrElse` chains flatten, and a conjunction distributes over the
    /// `OrElse` operands it holds: `And(x, OrElse(p, f))` yields
    /// `And(x, p)` then `And(x, f)`, so a fallback is judged against the
    /// rest of the conjunction. The first alternative that selects anything
    /// wins. Disjunctions are kept whole, and a tree with nothing to rewrite
    /// yields itself.
    pub fn alternatives(&self) -> Vec<FilterTree> {
        match &self.0 {
            FilterNode::OrElse { primary, fallback } => {
                let mut alternatives = primary.alternatives();
                alternatives.extend(fallback.alternatives());
                alternatives
            }
            FilterNode::And(operands) => {
                let expanded: Vec<Vec<FilterTree>> =
                    operands.iter().map(FilterTree::alternatives).collect();
                if expanded.iter().all(|options| options.len() == 1) {
                    return vec![self.clone()];
                }
                expanded
                    .into_iter()
                    .fold(vec![Vec::new()], |combinations, options| {
                        combinations
                            .iter()
                            .flat_map(|prefix| {
                                options.iter().map(move |option| {
                                    let mut combination = prefix.clone();
                                    combination.push(option.clone());
                                    combination
                                })
                            })
                            .collect()
                    })
                    .into_iter()
                    .map(Self::conjunction)
                    .collect()
            }
            _ => vec![self.clone()],
        }
    }

    /// Conjunction of operands already known to number at least two.
    fn conjunction(mut operands: Vec<FilterTree>) -> Self {
        operands.sort();
        Self(FilterNode::And(operands))
    }
}

fn value_set<I, S>(field: &'static str, values: I) -> Result<BTreeSet<String>, InvalidArgument>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    for value in values {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidArgument::blank(field));
        }
        set.insert(trimmed.to_owned());
    }
    if set.is_empty() {
        return Err(InvalidArgument::empty(field));
    }
    Ok(set)
}

fn canonical_operands<I>(field: &'static str, operands: I) -> Result<Vec<FilterTree>, InvalidArgument>
where
    I: IntoIterator<Item = FilterTree>,
{
    let mut children: Vec<FilterTree> = operands.into_iter().collect();
    if children.len() < MIN_OPERANDS {
        return Err(InvalidArgument::new(
            field,
            Constraint::MinOperands {
                min: MIN_OPERANDS,
                actual: children.len(),
            },
        ));
    }
    children.sort();
    Ok(children)
}

impl fmt::Display for FilterTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            FilterNode::ByUser(user) => write!(f, "owner = {user}"),
            FilterNode::AnyCategory(values) => write_set(f, "category", values),
            FilterNode::AnyShop(values) => write_set(f, "shop", values),
            FilterNode::AnyGrade(values) => write_set(f, "grade", values),
            FilterNode::AnyManufacturer(values) => write_set(f, "manufacturer", values),
            FilterNode::AnyIngredient(values) => write_set(f, "ingredient", values),
            FilterNode::AnyDish(values) => write_set(f, "dish", values),
            FilterNode::AnyMenu(values) => write_set(f, "menu", values),
            FilterNode::MinTags(tags) => {
                let joined: Vec<&str> = tags.iter().map(AsRef::as_ref).collect();
                write!(f, "tags contain [{}]", joined.join(", "))
            }
            FilterNode::And(children) => write_joined(f, children, " AND "),
            FilterNode::Or(children) => write_joined(f, children, " OR "),
            FilterNode::OrElse { primary, fallback } => {
                write!(f, "({primary} OR ELSE {fallback})")
            }
        }
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, label: &str, values: &BTreeSet<String>) -> fmt::Result {
    let joined: Vec<&str> = values.iter().map(String::as_str).collect();
    write!(f, "{label} in [{}]", joined.join(", "))
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[FilterTree], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (position, child) in children.iter().enumerate() {
        if position > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}
