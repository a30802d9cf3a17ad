//! Read port for menus.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::RepositoryError;
use crate::domain::{FilterTree, Menu, MenuField, MenuId, MenuProjection, ProjectedValue, SortSpec};

/// Port for looking up, counting, paging and projecting menus.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Find a menu by id.
    async fn find_by_id(&self, menu_id: &MenuId) -> Result<Option<Menu>, RepositoryError>;

    /// Number of menus matched by `filter`.
    async fn count(&self, filter: &FilterTree) -> Result<usize, RepositoryError>;

    /// One page of the menus matched by `filter`, ordered by `sort`.
    async fn page(
        &self,
        filter: &FilterTree,
        sort: &SortSpec<MenuField>,
        request: PageRequest,
    ) -> Result<Page<Menu>, RepositoryError>;

    /// Number of distinct `target` values across the matched menus.
    async fn projected_count(
        &self,
        filter: &FilterTree,
        target: MenuProjection,
    ) -> Result<usize, RepositoryError>;

    /// One page of distinct `target` values, ordered by value.
    async fn projected_page(
        &self,
        filter: &FilterTree,
        target: MenuProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError>;
}

/// Fixture implementation for tests that do not exercise menu reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMenuRepository;

#[async_trait]
impl MenuRepository for FixtureMenuRepository {
    async fn find_by_id(&self, _menu_id: &MenuId) -> Result<Option<Menu>, RepositoryError> {
        Ok(None)
    }

    async fn count(&self, _filter: &FilterTree) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    async fn page(
        &self,
        _filter: &FilterTree,
        _sort: &SortSpec<MenuField>,
        request: PageRequest,
    ) -> Result<Page<Menu>, RepositoryError> {
        Ok(Page::empty(request.size()))
    }

    async fn projected_count(
        &self,
        _filter: &FilterTree,
        _target: MenuProjection,
    ) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    async fn projected_page(
        &self,
        _filter: &FilterTree,
        _target: MenuProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError> {
        Ok(Page::empty(request.size()))
    }
}
