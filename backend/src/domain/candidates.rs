//! Resolution of an ingredient filter to one concrete product.
//!
//! Candidates are ordered by ascending price and addressed by ordinal: the
//! ordinal `n` selects the `n`th cheapest matching product. Ordinals past
//! the end select the last (most expensive) candidate. A filter holding
//! `OrElse` nodes is rewritten into its ordered alternatives (see
//! [`FilterTree::alternatives`]), which are counted in turn; the first one
//! that matches anything supplies the candidates.
//!
//! A [`CandidateResolver`] memoises repository reads for its own lifetime.
//! Create one per top-level operation so cached results never outlive the
//! call that produced them.

use std::collections::HashMap;

use pagination::{Page, PageRequest, Pageable};
use tracing::debug;

use super::catalogue::Product;
use super::error::PlanningError;
use super::filter::FilterTree;
use super::ports::ProductRepository;
use super::sort::{ProductField, SortSpec};

/// Number of candidates fetched per repository page.
pub const CANDIDATE_BATCH_SIZE: usize = 30;

type PageKey = (FilterTree, SortSpec<ProductField>, PageRequest);

/// Memoising candidate lookup over a [`ProductRepository`].
pub struct CandidateResolver<'a, P: ?Sized> {
    products: &'a P,
    sort: SortSpec<ProductField>,
    counts: HashMap<FilterTree, usize>,
    pages: HashMap<PageKey, Page<Product>>,
}

impl<'a, P> CandidateResolver<'a, P>
where
    P: ProductRepository + ?Sized,
{
    /// Resolve candidates against `products`, cheapest first.
    pub fn new(products: &'a P) -> Self {
        Self {
            products,
            sort: SortSpec::ascending(ProductField::Price),
            counts: HashMap::new(),
            pages: HashMap::new(),
        }
    }

    /// The product at `ordinal_index` among the candidates `filter`
    /// selects, clamped to the last candidate; `None` when nothing matches.
    pub async fn resolve(
        &mut self,
        filter: &FilterTree,
        ordinal_index: usize,
    ) -> Result<Option<Product>, PlanningError> {
        let request = Pageable::by_index(CANDIDATE_BATCH_SIZE, ordinal_index)?.normalize();
        let effective = self.select_alternative(filter).await?;

        let page = self.page(&effective, request).await?;
        let exact = page.get_absolute(ordinal_index);
        if exact.is_none() && !page.is_empty() {
            debug!(
                %effective,
                ordinal_index,
                total = page.metadata().total_items(),
                "ordinal past the end; using last candidate"
            );
        }
        Ok(exact.or_else(|| page.content().last()).cloned())
    }

    async fn select_alternative(&mut self, filter: &FilterTree) -> Result<FilterTree, PlanningError> {
        let alternatives = filter.alternatives();
        let Some((last, preferred)) = alternatives.split_last() else {
            return Ok(filter.clone());
        };
        for (position, alternative) in preferred.iter().enumerate() {
            if self.count(alternative).await? > 0 {
                debug!(%alternative, position, "using first matching alternative");
                return Ok(alternative.clone());
            }
        }
        if !preferred.is_empty() {
            debug!(fallback = %last, "no preferred alternative matched; using final fallback");
        }
        Ok(last.clone())
    }

    async fn count(&mut self, filter: &FilterTree) -> Result<usize, PlanningError> {
        if let Some(count) = self.counts.get(filter) {
            debug!(%filter, count, "candidate count cache hit");
            return Ok(*count);
        }
        let count = self.products.count(filter).await?;
        self.counts.insert(filter.clone(), count);
        Ok(count)
    }

    async fn page(
        &mut self,
        filter: &FilterTree,
        request: PageRequest,
    ) -> Result<Page<Product>, PlanningError> {
        let key = (filter.clone(), self.sort.clone(), request);
        if let Some(page) = self.pages.get(&key) {
            debug!(%filter, page = request.number(), "candidate page cache hit");
            return Ok(page.clone());
        }
        let page = self.products.page(filter, &self.sort, request).await?;
        self.pages.insert(key, page.clone());
        Ok(page)
    }
}
