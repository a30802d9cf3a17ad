//! Read port for products.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::RepositoryError;
use crate::domain::{FilterTree, Product, ProductField, ProductProjection, ProjectedValue, SortSpec};

/// Port for counting, paging and projecting products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Number of products matched by `filter`.
    async fn count(&self, filter: &FilterTree) -> Result<usize, RepositoryError>;

    /// One page of the products matched by `filter`, ordered by `sort`.
    ///
    /// A request past the last page yields the last page; an empty result
    /// set yields the canonical empty page.
    async fn page(
        &self,
        filter: &FilterTree,
        sort: &SortSpec<ProductField>,
        request: PageRequest,
    ) -> Result<Page<Product>, RepositoryError>;

    /// Number of distinct `target` values across the matched products.
    async fn projected_count(
        &self,
        filter: &FilterTree,
        target: ProductProjection,
    ) -> Result<usize, RepositoryError>;

    /// One page of distinct `target` values, ordered by value.
    async fn projected_page(
        &self,
        filter: &FilterTree,
        target: ProductProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError>;
}

/// Fixture implementation backed by an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductRepository;

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn count(&self, _filter: &FilterTree) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    async fn page(
        &self,
        _filter: &FilterTree,
        _sort: &SortSpec<ProductField>,
        request: PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        Ok(Page::empty(request.size()))
    }

    async fn projected_count(
        &self,
        _filter: &FilterTree,
        _target: ProductProjection,
    ) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    async fn projected_page(
        &self,
        _filter: &FilterTree,
        _target: ProductProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError> {
        Ok(Page::empty(request.size()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::UserId;

    #[rstest]
    #[tokio::test]
    async fn fixture_repository_is_empty() {
        let repo = FixtureProductRepository;
        let filter = FilterTree::by_user(UserId::random());
        let request = PageRequest::new(std::num::NonZeroUsize::MIN, 3);

        assert_eq!(repo.count(&filter).await.expect("count"), 0);
        let page = repo
            .page(&filter, &SortSpec::ascending(ProductField::Price), request)
            .await
            .expect("page");
        assert!(page.is_empty());
        assert_eq!(page.metadata().current_page(), 0);
    }
}
