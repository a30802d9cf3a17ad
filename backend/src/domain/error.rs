//! Domain-level error types.
//!
//! These errors are transport agnostic. [`InvalidArgument`] is raised
//! synchronously, before any repository call, when an argument breaks a
//! rule that can be checked locally. [`PlanningError`] carries it alongside
//! repository failures for operations that reach a port. Absence (no
//! candidate product, no grouping entry) is never an error: those
//! operations return `Option`.

use std::fmt;

use pagination::PaginationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{DishId, MenuId};
use super::ports::RepositoryError;

/// Rule an argument failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Text must contain something other than whitespace.
    NotBlank,
    /// A collection must hold at least one value.
    NotEmpty,
    /// A number must be strictly greater than zero.
    Positive,
    /// A number must be zero or greater.
    NotNegative,
    /// A combinator needs more operands.
    MinOperands { min: usize, actual: usize },
    /// An index does not address an existing entry.
    OutOfRange { index: usize, len: usize },
    /// A number lies outside an inclusive range.
    Between { min: u32, max: u32, actual: u32 },
    /// A name is not part of a fixed vocabulary.
    UnknownValue { value: String, expected: String },
    /// A value appears more than once where it must be unique.
    Duplicate { value: String },
    /// Derived data disagrees with the values it is derived from.
    Inconsistent { reason: String },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBlank => f.write_str("must not be blank"),
            Self::NotEmpty => f.write_str("must contain at least one value"),
            Self::Positive => f.write_str("must be greater than zero"),
            Self::NotNegative => f.write_str("must not be negative"),
            Self::MinOperands { min, actual } => {
                write!(f, "requires at least {min} operands (got {actual})")
            }
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} is out of range for {len} entries")
            }
            Self::Between { min, max, actual } => {
                write!(f, "must be between {min} and {max} (got {actual})")
            }
            Self::UnknownValue { value, expected } => {
                write!(f, "unknown value `{value}` (expected one of {expected})")
            }
            Self::Duplicate { value } => write!(f, "duplicate value `{value}`"),
            Self::Inconsistent { reason } => f.write_str(reason),
        }
    }
}

/// A caller-supplied argument failed validation.
///
/// # Examples
/// ```
/// use menu_planner::domain::{Constraint, InvalidArgument};
///
/// let err = InvalidArgument::new("serving_number", Constraint::Positive);
/// assert_eq!(err.to_string(), "invalid argument `serving_number`: must be greater than zero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument `{field}`: {constraint}")]
pub struct InvalidArgument {
    field: &'static str,
    constraint: Constraint,
}

impl InvalidArgument {
    /// Pair a field name with the rule it broke.
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }

    /// Name of the offending argument.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Rule the argument broke.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub(crate) fn blank(field: &'static str) -> Self {
        Self::new(field, Constraint::NotBlank)
    }

    pub(crate) fn empty(field: &'static str) -> Self {
        Self::new(field, Constraint::NotEmpty)
    }

    pub(crate) fn not_positive(field: &'static str) -> Self {
        Self::new(field, Constraint::Positive)
    }

    pub(crate) fn negative(field: &'static str) -> Self {
        Self::new(field, Constraint::NotNegative)
    }

    pub(crate) fn out_of_range(field: &'static str, index: usize, len: usize) -> Self {
        Self::new(field, Constraint::OutOfRange { index, len })
    }

    pub(crate) fn unknown_value(
        field: &'static str,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(
            field,
            Constraint::UnknownValue {
                value: value.into(),
                expected: expected.into(),
            },
        )
    }

    pub(crate) fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        Self::new(
            field,
            Constraint::Duplicate {
                value: value.into(),
            },
        )
    }
}

impl From<PaginationError> for InvalidArgument {
    fn from(value: PaginationError) -> Self {
        match value {
            PaginationError::ZeroPageSize => Self::not_positive("page_size"),
            other => Self::new(
                "page",
                Constraint::Inconsistent {
                    reason: other.to_string(),
                },
            ),
        }
    }
}

/// Stable machine-readable category adapters map onto their own status
/// codes (for HTTP: 400, 404, 503, 500).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// A referenced entity does not exist.
    NotFound,
    /// A driven adapter could not be reached.
    ServiceUnavailable,
    /// An unexpected failure inside a driven adapter.
    InternalError,
}

/// Failure of an operation that consults repository ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// An argument failed local validation.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    /// A repository call failed; surfaced unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// A menu item references a dish the repository does not hold.
    #[error("dish {dish_id} referenced by a menu item does not exist")]
    DishNotFound { dish_id: DishId },
    /// The requested menu does not exist.
    #[error("menu {menu_id} does not exist")]
    MenuNotFound { menu_id: MenuId },
}

impl PlanningError {
    /// Category adapters use to choose a response.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidRequest,
            Self::Repository(RepositoryError::Connection { .. }) => ErrorCode::ServiceUnavailable,
            Self::Repository(RepositoryError::Query { .. }) => ErrorCode::InternalError,
            Self::DishNotFound { .. } | Self::MenuNotFound { .. } => ErrorCode::NotFound,
        }
    }
}

impl From<PaginationError> for PlanningError {
    fn from(value: PaginationError) -> Self {
        Self::InvalidArgument(value.into())
    }
}
