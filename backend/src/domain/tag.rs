//! Normalised labels attached to products, dishes and menus.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::InvalidArgument;

/// A case- and whitespace-insensitive label.
///
/// Construction trims the input, collapses internal whitespace runs to a
/// single space and lowercases the result. Equality, ordering and hashing
/// all use the normalised value.
///
/// # Examples
/// ```
/// use menu_planner::domain::Tag;
///
/// let tag = Tag::new("  Dairy   Free ")?;
/// assert_eq!(tag.as_ref(), "dairy free");
/// assert_eq!(tag, Tag::new("DAIRY FREE")?);
/// # Ok::<(), menu_planner::domain::InvalidArgument>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Normalise and validate a label.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidArgument> {
        let normalised = raw
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if normalised.is_empty() {
            return Err(InvalidArgument::blank("tag"));
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl TryFrom<String> for Tag {
    type Error = InvalidArgument;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
