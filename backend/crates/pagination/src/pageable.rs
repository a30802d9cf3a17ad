//! Page addressing by page number or by absolute item index.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::PaginationError;

/// A caller's request for one page of a result set.
///
/// `ByIndex` asks for "the page containing the item at position `index`"
/// without the caller knowing where page boundaries fall. Both forms are
/// normalised with [`Pageable::normalize`] before reaching a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Pageable {
    /// Address a page by its zero-based number.
    ByNumber {
        /// Requested number of items per page.
        size: NonZeroUsize,
        /// Zero-based page number.
        number: usize,
    },
    /// Address the page that contains an absolute item position.
    ByIndex {
        /// Requested number of items per page.
        size: NonZeroUsize,
        /// Zero-based absolute item position.
        index: usize,
    },
}

impl Pageable {
    /// Build a page-number request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub fn by_number(size: usize, number: usize) -> Result<Self, PaginationError> {
        let page_size = NonZeroUsize::new(size).ok_or(PaginationError::ZeroPageSize)?;
        Ok(Self::ByNumber {
            size: page_size,
            number,
        })
    }

    /// Build an item-index request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub fn by_index(size: usize, index: usize) -> Result<Self, PaginationError> {
        let page_size = NonZeroUsize::new(size).ok_or(PaginationError::ZeroPageSize)?;
        Ok(Self::ByIndex {
            size: page_size,
            index,
        })
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> NonZeroUsize {
        match *self {
            Self::ByNumber { size, .. } | Self::ByIndex { size, .. } => size,
        }
    }

    /// Convert into the page-number form handed to repositories.
    ///
    /// An index request maps onto page `index / size`.
    #[must_use]
    pub const fn normalize(&self) -> PageRequest {
        match *self {
            Self::ByNumber { size, number } => PageRequest::new(size, number),
            Self::ByIndex { size, index } => PageRequest::new(size, index.div_euclid(size.get())),
        }
    }
}

impl From<Pageable> for PageRequest {
    fn from(value: Pageable) -> Self {
        value.normalize()
    }
}

/// Normalised page request: a page size and a zero-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    size: NonZeroUsize,
    number: usize,
}

impl PageRequest {
    /// Build a request for page `number` of `size` items.
    #[must_use]
    pub const fn new(size: NonZeroUsize, number: usize) -> Self {
        Self { size, number }
    }

    /// Request the final page of a result set holding `total_items`.
    ///
    /// For an empty result set this is page zero.
    #[must_use]
    pub const fn last(size: NonZeroUsize, total_items: usize) -> Self {
        Self::new(size, last_page_number(total_items, size))
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> NonZeroUsize {
        self.size
    }

    /// Requested zero-based page number.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Absolute position of the first item on the requested page, or
    /// `None` when that position does not fit in `usize`.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        self.number.checked_mul(self.size.get())
    }

    /// Clamp the page number onto the pages that exist for `total_items`.
    ///
    /// Requests past the final page become requests for the final page;
    /// every request against an empty result set becomes page zero.
    #[must_use]
    pub const fn clamp(self, total_items: usize) -> Self {
        let last = last_page_number(total_items, self.size);
        if self.number > last {
            Self::new(self.size, last)
        } else {
            self
        }
    }
}

/// Number of pages needed for `total_items` items.
pub(crate) const fn page_count(total_items: usize, size: NonZeroUsize) -> usize {
    total_items.div_ceil(size.get())
}

const fn last_page_number(total_items: usize, size: NonZeroUsize) -> usize {
    page_count(total_items, size).saturating_sub(1)
}
