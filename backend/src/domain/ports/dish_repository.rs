//! Read port for dishes.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::RepositoryError;
use crate::domain::{Dish, DishField, DishId, DishProjection, FilterTree, ProjectedValue, SortSpec};

/// Port for looking up, counting, paging and projecting dishes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Find a dish by id.
    async fn find_by_id(&self, dish_id: &DishId) -> Result<Option<Dish>, RepositoryError>;

    /// Number of dishes matched by `filter`.
    async fn count(&self, filter: &FilterTree) -> Result<usize, RepositoryError>;

    /// One page of the dishes matched by `filter`, ordered by `sort`.
    async fn page(
        &self,
        filter: &FilterTree,
        sort: &SortSpec<DishField>,
        request: PageRequest,
    ) -> Result<Page<Dish>, RepositoryError>;

    /// Number of distinct `target` values across the matched dishes.
    async fn projected_count(
        &self,
        filter: &FilterTree,
        target: DishProjection,
    ) -> Result<usize, RepositoryError>;

    /// One page of distinct `target` values, ordered by value.
    async fn projected_page(
        &self,
        filter: &FilterTree,
        target: DishProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError>;
}

/// Fixture implementation for tests that do not exercise dish reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDishRepository;

#[async_trait]
impl DishRepository for FixtureDishRepository {
    async fn find_by_id(&self, _dish_id: &DishId) -> Result<Option<Dish>, RepositoryError> {
        Ok(None)
    }

    async fn count(&self, _filter: &FilterTree) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    async fn page(
        &self,
        _filter: &FilterTree,
        _sort: &SortSpec<DishField>,
        request: PageRequest,
    ) -> Result<Page<Dish>, RepositoryError> {
        Ok(Page::empty(request.size()))
    }

    async fn projected_count(
        &self,
        _filter: &FilterTree,
        _target: DishProjection,
    ) -> Result<usize, RepositoryError> {
        Ok(0)
    }

    async fn projected_page(
        &self,
        _filter: &FilterTree,
        _target: DishProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError> {
        Ok(Page::empty(request.size()))
    }
}
