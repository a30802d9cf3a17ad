//! Errors raised while building page requests and page envelopes.

use thiserror::Error;

/// Validation failures for [`crate::Pageable`], [`crate::PageMetadata`] and
/// [`crate::Page`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// The content supplied for a page is larger than the page size.
    #[error("page content holds {actual} items but the page size is {size}")]
    ContentExceedsPageSize {
        /// Number of items supplied.
        actual: usize,
        /// Requested page size.
        size: usize,
    },

    /// The content length disagrees with the item range the metadata
    /// describes.
    #[error("page content holds {actual} items but the metadata describes {expected}")]
    ContentMismatch {
        /// Number of items the metadata implies.
        expected: usize,
        /// Number of items supplied.
        actual: usize,
    },

    /// A derived metadata field disagrees with the values it derives from.
    #[error("page metadata field `{field}` is inconsistent with the item count")]
    InconsistentMetadata {
        /// Name of the offending field.
        field: &'static str,
    },
}
