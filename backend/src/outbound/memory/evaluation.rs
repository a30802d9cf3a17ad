//! Set-semantics evaluation of filter trees over in-process collections.
//!
//! Leaves are tested per entity. Composites combine result sets: `And`
//! narrows through its operands, `Or` unites, and `OrElse` keeps the
//! primary set unless it is empty. Every node is evaluated within the set
//! its enclosing conjunction allows, and a conjunction holding `OrElse`
//! operands is tried as its ordered [`FilterTree::alternatives`], so a
//! fallback is never skipped because the primary matched entities the rest
//! of the conjunction excludes. Attribute predicates that do not apply to
//! an entity kind (a shop filter against a dish, say) match nothing.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Dish, DishId, FilterNode, FilterTree, Menu, Product, ProjectedValue};

use super::Contents;

/// An entity a filter leaf can be tested against.
pub(super) trait Subject {
    /// Whether this entity satisfies a leaf predicate.
    ///
    /// Composite nodes never reach this method.
    fn matches(&self, leaf: &FilterNode, contents: &Contents) -> bool;
}

/// Positions in `subjects` selected by `filter`, in ascending order.
pub(super) fn select<S: Subject>(
    filter: &FilterTree,
    subjects: &[S],
    contents: &Contents,
) -> BTreeSet<usize> {
    let everything: BTreeSet<usize> = (0..subjects.len()).collect();
    select_within(filter, subjects, contents, &everything)
}

fn select_within<S: Subject>(
    filter: &FilterTree,
    subjects: &[S],
    contents: &Contents,
    domain: &BTreeSet<usize>,
) -> BTreeSet<usize> {
    match filter.node() {
        FilterNode::And(operands) => {
            let alternatives = filter.alternatives();
            if alternatives.len() > 1 {
                return first_non_empty(&alternatives, subjects, contents, domain);
            }
            operands.iter().fold(domain.clone(), |narrowed, operand| {
                select_within(operand, subjects, contents, &narrowed)
            })
        }
        FilterNode::Or(operands) => operands
            .iter()
            .flat_map(|operand| select_within(operand, subjects, contents, domain))
            .collect(),
        FilterNode::OrElse { .. } => {
            first_non_empty(&filter.alternatives(), subjects, contents, domain)
        }
        leaf => domain
            .iter()
            .copied()
            .filter(|&position| {
                subjects
                    .get(position)
                    .is_some_and(|subject| subject.matches(leaf, contents))
            })
            .collect(),
    }
}

fn first_non_empty<S: Subject>(
    alternatives: &[FilterTree],
    subjects: &[S],
    contents: &Contents,
    domain: &BTreeSet<usize>,
) -> BTreeSet<usize> {
    alternatives
        .iter()
        .map(|alternative| select_within(alternative, subjects, contents, domain))
        .find(|selected| !selected.is_empty())
        .unwrap_or_default()
}

/// Entities of `subjects` selected by `filter`, cloned in storage order.
pub(super) fn matching<S: Subject + Clone>(
    filter: &FilterTree,
    subjects: &[S],
    contents: &Contents,
) -> Vec<S> {
    select(filter, subjects, contents)
        .into_iter()
        .filter_map(|position| subjects.get(position).cloned())
        .collect()
}

/// Distinct values with the number of entities carrying each, ordered by
/// value.
pub(super) fn project<'a, I>(values: I) -> Vec<ProjectedValue>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| ProjectedValue::new(value, count))
        .collect()
}

fn contains(values: &BTreeSet<String>, candidate: &str) -> bool {
    values.contains(candidate)
}

impl Subject for Product {
    fn matches(&self, leaf: &FilterNode, _contents: &Contents) -> bool {
        match leaf {
            FilterNode::ByUser(owner) => self.owner() == *owner,
            FilterNode::AnyCategory(values) => contains(values, self.category()),
            FilterNode::AnyShop(values) => contains(values, self.shop()),
            FilterNode::AnyGrade(values) => contains(values, self.grade()),
            FilterNode::AnyManufacturer(values) => contains(values, self.manufacturer()),
            FilterNode::MinTags(tags) => tags.is_subset(self.tags()),
            FilterNode::AnyIngredient(_)
            | FilterNode::AnyDish(_)
            | FilterNode::AnyMenu(_)
            | FilterNode::And(_)
            | FilterNode::Or(_)
            | FilterNode::OrElse { .. } => false,
        }
    }
}

impl Subject for Dish {
    fn matches(&self, leaf: &FilterNode, contents: &Contents) -> bool {
        match leaf {
            FilterNode::ByUser(owner) => self.owner() == *owner,
            FilterNode::AnyIngredient(values) => self
                .ingredients()
                .iter()
                .any(|ingredient| contains(values, ingredient.name())),
            FilterNode::AnyDish(values) => contains(values, self.name()),
            FilterNode::AnyMenu(values) => contents
                .menus
                .iter()
                .filter(|menu| contains(values, menu.name()))
                .any(|menu| uses_dish(menu, self.id())),
            FilterNode::MinTags(tags) => tags.is_subset(self.tags()),
            FilterNode::AnyCategory(_)
            | FilterNode::AnyShop(_)
            | FilterNode::AnyGrade(_)
            | FilterNode::AnyManufacturer(_)
            | FilterNode::And(_)
            | FilterNode::Or(_)
            | FilterNode::OrElse { .. } => false,
        }
    }
}

impl Subject for Menu {
    fn matches(&self, leaf: &FilterNode, contents: &Contents) -> bool {
        match leaf {
            FilterNode::ByUser(owner) => self.owner() == *owner,
            FilterNode::AnyMenu(values) => contains(values, self.name()),
            FilterNode::AnyDish(values) => self.dish_ids().into_iter().any(|dish_id| {
                contents
                    .dish(dish_id)
                    .is_some_and(|dish| contains(values, dish.name()))
            }),
            FilterNode::MinTags(tags) => tags.is_subset(self.tags()),
            FilterNode::AnyCategory(_)
            | FilterNode::AnyShop(_)
            | FilterNode::AnyGrade(_)
            | FilterNode::AnyManufacturer(_)
            | FilterNode::AnyIngredient(_)
            | FilterNode::And(_)
            | FilterNode::Or(_)
            | FilterNode::OrElse { .. } => false,
        }
    }
}

fn uses_dish(menu: &Menu, dish_id: DishId) -> bool {
    menu.items().iter().any(|item| item.dish_id() == dish_id)
}
