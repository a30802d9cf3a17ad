//! Wire form of [`FilterTree`] used by serde.
//!
//! Deserialisation replays the validating constructors, so a document
//! cannot describe a tree the constructors would reject.

use serde::{Deserialize, Serialize};

use super::{FilterNode, FilterTree};
use crate::domain::error::InvalidArgument;
use crate::domain::ids::UserId;
use crate::domain::tag::Tag;

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub(super) enum FilterTreeDto {
    ByUser {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    AnyCategory {
        values: Vec<String>,
    },
    AnyShop {
        values: Vec<String>,
    },
    AnyGrade {
        values: Vec<String>,
    },
    AnyManufacturer {
        values: Vec<String>,
    },
    AnyIngredient {
        values: Vec<String>,
    },
    AnyDish {
        values: Vec<String>,
    },
    AnyMenu {
        values: Vec<String>,
    },
    MinTags {
        tags: Vec<Tag>,
    },
    And {
        operands: Vec<FilterTree>,
    },
    Or {
        operands: Vec<FilterTree>,
    },
    OrElse {
        primary: Box<FilterTree>,
        fallback: Box<FilterTree>,
    },
}

impl From<FilterTree> for FilterTreeDto {
    fn from(value: FilterTree) -> Self {
        match value.0 {
            FilterNode::ByUser(user_id) => Self::ByUser { user_id },
            FilterNode::AnyCategory(set) => Self::AnyCategory {
                values: set.into_iter().collect(),
            },
            FilterNode::AnyShop(set) => Self::AnyShop {
                values: set.into_iter().collect(),
            },
            FilterNode::AnyGrade(set) => Self::AnyGrade {
                values: set.into_iter().collect(),
            },
            FilterNode::AnyManufacturer(set) => Self::AnyManufacturer {
                values: set.into_iter().collect(),
            },
            FilterNode::AnyIngredient(set) => Self::AnyIngredient {
                values: set.into_iter().collect(),
            },
            FilterNode::AnyDish(set) => Self::AnyDish {
                values: set.into_iter().collect(),
            },
            FilterNode::AnyMenu(set) => Self::AnyMenu {
                values: set.into_iter().collect(),
            },
            FilterNode::MinTags(tags) => Self::MinTags {
                tags: tags.into_iter().collect(),
            },
            FilterNode::And(operands) => Self::And { operands },
            FilterNode::Or(operands) => Self::Or { operands },
            FilterNode::OrElse { primary, fallback } => Self::OrElse { primary, fallback },
        }
    }
}

impl TryFrom<FilterTreeDto> for FilterTree {
    type Error = InvalidArgument;

    fn try_from(value: FilterTreeDto) -> Result<Self, Self::Error> {
        match value {
            FilterTreeDto::ByUser { user_id } => Ok(Self::by_user(user_id)),
            FilterTreeDto::AnyCategory { values } => Self::any_category(values),
            FilterTreeDto::AnyShop { values } => Self::any_shop(values),
            FilterTreeDto::AnyGrade { values } => Self::any_grade(values),
            FilterTreeDto::AnyManufacturer { values } => Self::any_manufacturer(values),
            FilterTreeDto::AnyIngredient { values } => Self::any_ingredient(values),
            FilterTreeDto::AnyDish { values } => Self::any_dish(values),
            FilterTreeDto::AnyMenu { values } => Self::any_menu(values),
            FilterTreeDto::MinTags { tags } => Self::min_tags(tags),
            FilterTreeDto::And { operands } => Self::and(operands),
            FilterTreeDto::Or { operands } => Self::or(operands),
            FilterTreeDto::OrElse { primary, fallback } => Ok(Self::or_else(*primary, *fallback)),
        }
    }
}
