//! Page addressing and page envelopes shared by repository ports.
//!
//! Callers describe the slice of a result set they want with a
//! [`Pageable`]: either a zero-based page number or the absolute index of
//! an item whose page they want. Before a request reaches a repository it
//! is normalised into a [`PageRequest`], which always addresses a page by
//! number. Repositories answer with a [`Page`] whose [`PageMetadata`]
//! reports the total item count and the page that was actually served.
//!
//! Two rules hold for every page produced here:
//!
//! - a request beyond the last page is clamped onto the last page, so
//!   asking for "far past the end" degrades to "the final items";
//! - an empty result set always produces the canonical empty metadata,
//!   whose current page is forced to zero.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, Pageable};
//!
//! let request = Pageable::by_index(5, 7)?.normalize();
//! assert_eq!(request.number(), 1);
//!
//! let page = Page::paginate((0..9).collect::<Vec<_>>(), request);
//! assert_eq!(page.content(), &[5, 6, 7, 8]);
//! assert!(page.metadata().is_last());
//! # Ok::<(), pagination::PaginationError>(())
//! ```

mod error;
mod page;
mod pageable;

pub use error::PaginationError;
pub use page::{Page, PageMetadata};
pub use pageable::{PageRequest, Pageable};
