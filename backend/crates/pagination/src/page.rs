//! Page metadata and page envelopes.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::PaginationError;
use crate::pageable::{PageRequest, page_count};

/// Item count and page boundaries for one served page.
///
/// ## Invariants
/// - When `total_items` is zero the metadata is the canonical empty value:
///   no pages, current page zero, both first and last.
/// - Otherwise `number_of_pages = ceil(total_items / page_size)` and
///   `current_page < number_of_pages`.
///
/// Two empty metadata values compare equal whatever page size was
/// requested; all other comparisons include the page size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "PageMetadataDto", into = "PageMetadataDto")]
pub struct PageMetadata {
    total_items: usize,
    page_size: NonZeroUsize,
    number_of_pages: usize,
    current_page: usize,
    first: bool,
    last: bool,
}

impl PageMetadata {
    /// The canonical empty metadata for a result set with no items.
    #[must_use]
    pub const fn empty(page_size: NonZeroUsize) -> Self {
        Self {
            total_items: 0,
            page_size,
            number_of_pages: 0,
            current_page: 0,
            first: true,
            last: true,
        }
    }

    /// Describe the page served for `request` out of `total_items` items.
    ///
    /// Requests past the final page are clamped onto it.
    #[must_use]
    pub const fn new(total_items: usize, request: PageRequest) -> Self {
        if total_items == 0 {
            return Self::empty(request.size());
        }
        let served = request.clamp(total_items);
        let number_of_pages = page_count(total_items, request.size());
        let current_page = served.number();
        Self {
            total_items,
            page_size: request.size(),
            number_of_pages,
            current_page,
            first: current_page == 0,
            last: current_page.saturating_add(1) == number_of_pages,
        }
    }

    /// Total number of items in the whole result set.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Number of pages that exist for the result set.
    #[must_use]
    pub const fn number_of_pages(&self) -> usize {
        self.number_of_pages
    }

    /// Zero-based number of the page actually served.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Whether the served page is the first one.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.first
    }

    /// Whether the served page is the last one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.last
    }

    /// Whether this is the canonical empty metadata.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// The request that addresses exactly the served page.
    #[must_use]
    pub const fn served_request(&self) -> PageRequest {
        PageRequest::new(self.page_size, self.current_page)
    }

    /// Absolute positions of the items on the served page.
    #[must_use]
    pub fn item_range(&self) -> Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        let start = self
            .current_page
            .saturating_mul(self.page_size.get())
            .min(self.total_items);
        let end = start
            .saturating_add(self.page_size.get())
            .min(self.total_items);
        start..end
    }
}

impl PartialEq for PageMetadata {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        self.total_items == other.total_items
            && self.page_size == other.page_size
            && self.current_page == other.current_page
    }
}

impl Eq for PageMetadata {}

impl Hash for PageMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.total_items.hash(state);
        if !self.is_empty() {
            self.page_size.hash(state);
            self.current_page.hash(state);
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMetadataDto {
    total_items: usize,
    page_size: NonZeroUsize,
    number_of_pages: usize,
    current_page: usize,
    is_first: bool,
    is_last: bool,
}

impl From<PageMetadata> for PageMetadataDto {
    fn from(value: PageMetadata) -> Self {
        Self {
            total_items: value.total_items,
            page_size: value.page_size,
            number_of_pages: value.number_of_pages,
            current_page: value.current_page,
            is_first: value.first,
            is_last: value.last,
        }
    }
}

impl TryFrom<PageMetadataDto> for PageMetadata {
    type Error = PaginationError;

    fn try_from(value: PageMetadataDto) -> Result<Self, Self::Error> {
        let rebuilt = Self::new(
            value.total_items,
            PageRequest::new(value.page_size, value.current_page),
        );
        if rebuilt.current_page != value.current_page {
            return Err(PaginationError::InconsistentMetadata {
                field: "currentPage",
            });
        }
        if rebuilt.number_of_pages != value.number_of_pages {
            return Err(PaginationError::InconsistentMetadata {
                field: "numberOfPages",
            });
        }
        if rebuilt.first != value.is_first || rebuilt.last != value.is_last {
            return Err(PaginationError::InconsistentMetadata {
                field: "isFirst/isLast",
            });
        }
        Ok(rebuilt)
    }
}

/// One page of a result set: its metadata plus the items on it.
///
/// Deserialisation goes through [`Page::new`], so a payload whose content
/// disagrees with its metadata is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PageDto<T>")]
pub struct Page<T> {
    metadata: PageMetadata,
    content: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageDto<T> {
    metadata: PageMetadata,
    content: Vec<T>,
}

impl<T> TryFrom<PageDto<T>> for Page<T> {
    type Error = PaginationError;

    fn try_from(value: PageDto<T>) -> Result<Self, Self::Error> {
        Self::new(value.metadata, value.content)
    }
}

impl<T> Page<T> {
    /// Pair metadata with the content of the served page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ContentExceedsPageSize`] when `content`
    /// holds more items than the page size, or
    /// [`PaginationError::ContentMismatch`] when its length differs from the
    /// item range the metadata describes.
    pub fn new(metadata: PageMetadata, content: Vec<T>) -> Result<Self, PaginationError> {
        let size = metadata.page_size().get();
        if content.len() > size {
            return Err(PaginationError::ContentExceedsPageSize {
                actual: content.len(),
                size,
            });
        }
        let expected = metadata.item_range().len();
        if content.len() != expected {
            return Err(PaginationError::ContentMismatch {
                expected,
                actual: content.len(),
            });
        }
        Ok(Self { metadata, content })
    }

    /// The canonical empty page.
    #[must_use]
    pub const fn empty(page_size: NonZeroUsize) -> Self {
        Self {
            metadata: PageMetadata::empty(page_size),
            content: Vec::new(),
        }
    }

    /// Cut the page addressed by `request` out of an already ordered result
    /// set, clamping past-the-end requests onto the final page.
    #[must_use]
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let metadata = PageMetadata::new(items.len(), request);
        let range = metadata.item_range();
        let content = items
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect();
        Self { metadata, content }
    }

    /// Metadata describing the served page.
    #[must_use]
    pub const fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    /// Items on the served page, in result-set order.
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Whether the page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Item at absolute result-set position `index`, if it is on this page.
    #[must_use]
    pub fn get_absolute(&self, index: usize) -> Option<&T> {
        let range = self.metadata.item_range();
        if !range.contains(&index) {
            return None;
        }
        self.content.get(index.saturating_sub(range.start))
    }

    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            metadata: self.metadata,
            content: self.content.into_iter().map(f).collect(),
        }
    }
}
