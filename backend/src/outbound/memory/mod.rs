//! In-process catalogue implementing every repository port.
//!
//! Products, dishes and menus live in plain vectors behind a lock. Filters
//! are evaluated with set semantics, results are ordered with
//! [`SortSpec::compare`] and cut into pages with [`Page::paginate`], so the
//! adapter applies the same clamping policy as any other implementation.
//!
//! The catalogue checks that every menu item names an existing dish owned
//! by the menu's owner when it is loaded, which is where the domain expects
//! that ownership rule to be enforced.

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{DishRepository, MenuRepository, ProductRepository, RepositoryError};
use crate::domain::{
    Dish, DishField, DishId, DishProjection, FilterTree, Menu, MenuField, MenuId, MenuProjection,
    Product, ProductField, ProductProjection, ProjectedValue, SortSpec, Sortable,
};

mod evaluation;

#[cfg(test)]
mod tests;

use evaluation::{matching, project};

/// Serialised form of a whole catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogueDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub menus: Vec<Menu>,
}

/// Reasons a catalogue document cannot be loaded.
#[derive(Debug, Error)]
pub enum CatalogueLoadError {
    /// The document is not valid JSON or fails entity validation.
    #[error("invalid catalogue document: {0}")]
    Document(#[from] serde_json::Error),
    /// Two entities of one kind share an id.
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },
    /// A menu item refers to a dish that is not in the catalogue.
    #[error("menu {menu_id} refers to unknown dish {dish_id}")]
    UnknownDish { menu_id: MenuId, dish_id: DishId },
    /// A menu item refers to a dish owned by someone else.
    #[error("menu {menu_id} refers to dish {dish_id} owned by another user")]
    ForeignDish { menu_id: MenuId, dish_id: DishId },
}

#[derive(Debug, Default)]
struct Contents {
    products: Vec<Product>,
    dishes: Vec<Dish>,
    menus: Vec<Menu>,
}

impl Contents {
    fn dish(&self, dish_id: DishId) -> Option<&Dish> {
        self.dishes.iter().find(|dish| dish.id() == dish_id)
    }

    fn validate(&self) -> Result<(), CatalogueLoadError> {
        ensure_unique("product", self.products.iter().map(|p| p.id().to_string()))?;
        ensure_unique("dish", self.dishes.iter().map(|d| d.id().to_string()))?;
        ensure_unique("menu", self.menus.iter().map(|m| m.id().to_string()))?;

        for menu in &self.menus {
            for dish_id in menu.dish_ids() {
                let dish = self.dish(dish_id).ok_or(CatalogueLoadError::UnknownDish {
                    menu_id: menu.id(),
                    dish_id,
                })?;
                if dish.owner() != menu.owner() {
                    return Err(CatalogueLoadError::ForeignDish {
                        menu_id: menu.id(),
                        dish_id,
                    });
                }
            }
        }
        Ok(())
    }
}

fn ensure_unique<I>(kind: &'static str, ids: I) -> Result<(), CatalogueLoadError>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(CatalogueLoadError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

/// Lock-protected catalogue serving the product, dish and menu ports.
#[derive(Debug, Default)]
pub struct InMemoryCatalogue {
    contents: RwLock<Contents>,
}

impl InMemoryCatalogue {
    /// Build a catalogue from a document, checking ids and dish ownership.
    pub fn from_document(document: CatalogueDocument) -> Result<Self, CatalogueLoadError> {
        let contents = Contents {
            products: document.products,
            dishes: document.dishes,
            menus: document.menus,
        };
        contents.validate()?;
        info!(
            products = contents.products.len(),
            dishes = contents.dishes.len(),
            menus = contents.menus.len(),
            "loaded in-memory catalogue"
        );
        Ok(Self {
            contents: RwLock::new(contents),
        })
    }

    /// Parse a JSON catalogue document and load it.
    pub fn from_json(json: &str) -> Result<Self, CatalogueLoadError> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Swap the whole product list, returning the previous one.
    pub fn replace_products(&self, products: Vec<Product>) -> Result<Vec<Product>, RepositoryError> {
        let mut contents = self.write()?;
        debug!(
            previous = contents.products.len(),
            next = products.len(),
            "replacing catalogue products"
        );
        Ok(std::mem::replace(&mut contents.products, products))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Contents>, RepositoryError> {
        self.contents
            .read()
            .map_err(|_| RepositoryError::connection("catalogue lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Contents>, RepositoryError> {
        self.contents
            .write()
            .map_err(|_| RepositoryError::connection("catalogue lock poisoned"))
    }
}

fn sorted_page<T>(mut items: Vec<T>, sort: &SortSpec<T::Field>, request: PageRequest) -> Page<T>
where
    T: Sortable,
{
    items.sort_by(|a, b| sort.compare(a, b));
    Page::paginate(items, request)
}

#[async_trait]
impl ProductRepository for InMemoryCatalogue {
    async fn count(&self, filter: &FilterTree) -> Result<usize, RepositoryError> {
        let contents = self.read()?;
        Ok(matching(filter, &contents.products, &contents).len())
    }

    async fn page(
        &self,
        filter: &FilterTree,
        sort: &SortSpec<ProductField>,
        request: PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        let contents = self.read()?;
        let products = matching(filter, &contents.products, &contents);
        Ok(sorted_page(products, sort, request))
    }

    async fn projected_count(
        &self,
        filter: &FilterTree,
        target: ProductProjection,
    ) -> Result<usize, RepositoryError> {
        let contents = self.read()?;
        let products = matching(filter, &contents.products, &contents);
        Ok(project(products.iter().flat_map(|p| p.projected_values(target))).len())
    }

    async fn projected_page(
        &self,
        filter: &FilterTree,
        target: ProductProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError> {
        let contents = self.read()?;
        let products = matching(filter, &contents.products, &contents);
        let values = project(products.iter().flat_map(|p| p.projected_values(target)));
        Ok(Page::paginate(values, request))
    }
}

#[async_trait]
impl DishRepository for InMemoryCatalogue {
    async fn find_by_id(&self, dish_id: &DishId) -> Result<Option<Dish>, RepositoryError> {
        Ok(self.read()?.dish(*dish_id).cloned())
    }

    async fn count(&self, filter: &FilterTree) -> Result<usize, RepositoryError> {
        let contents = self.read()?;
        Ok(matching(filter, &contents.dishes, &contents).len())
    }

    async fn page(
        &self,
        filter: &FilterTree,
        sort: &SortSpec<DishField>,
        request: PageRequest,
    ) -> Result<Page<Dish>, RepositoryError> {
        let contents = self.read()?;
        let dishes = matching(filter, &contents.dishes, &contents);
        Ok(sorted_page(dishes, sort, request))
    }

    async fn projected_count(
        &self,
        filter: &FilterTree,
        target: DishProjection,
    ) -> Result<usize, RepositoryError> {
        let contents = self.read()?;
        let dishes = matching(filter, &contents.dishes, &contents);
        Ok(project(dishes.iter().flat_map(|d| d.projected_values(target))).len())
    }

    async fn projected_page(
        &self,
        filter: &FilterTree,
        target: DishProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError> {
        let contents = self.read()?;
        let dishes = matching(filter, &contents.dishes, &contents);
        let values = project(dishes.iter().flat_map(|d| d.projected_values(target)));
        Ok(Page::paginate(values, request))
    }
}

#[async_trait]
impl MenuRepository for InMemoryCatalogue {
    async fn find_by_id(&self, menu_id: &MenuId) -> Result<Option<Menu>, RepositoryError> {
        let contents = self.read()?;
        Ok(contents.menus.iter().find(|menu| menu.id() == *menu_id).cloned())
    }

    async fn count(&self, filter: &FilterTree) -> Result<usize, RepositoryError> {
        let contents = self.read()?;
        Ok(matching(filter, &contents.menus, &contents).len())
    }

    async fn page(
        &self,
        filter: &FilterTree,
        sort: &SortSpec<MenuField>,
        request: PageRequest,
    ) -> Result<Page<Menu>, RepositoryError> {
        let contents = self.read()?;
        let menus = matching(filter, &contents.menus, &contents);
        Ok(sorted_page(menus, sort, request))
    }

    async fn projected_count(
        &self,
        filter: &FilterTree,
        target: MenuProjection,
    ) -> Result<usize, RepositoryError> {
        let contents = self.read()?;
        let menus = matching(filter, &contents.menus, &contents);
        Ok(project(menus.iter().flat_map(|m| m.projected_values(target))).len())
    }

    async fn projected_page(
        &self,
        filter: &FilterTree,
        target: MenuProjection,
        request: PageRequest,
    ) -> Result<Page<ProjectedValue>, RepositoryError> {
        let contents = self.read()?;
        let menus = matching(filter, &contents.menus, &contents);
        let values = project(menus.iter().flat_map(|m| m.projected_values(target)));
        Ok(Page::paginate(values, request))
    }
}
