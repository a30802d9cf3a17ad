//! Tests for filter evaluation, ordering, projection and loading.

use std::num::NonZeroUsize;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::{Direction, ProductId, UserId};
use crate::test_support::{ProductBuilder, dish, ingredient, menu, tags_filter};

fn request(size: usize, number: usize) -> PageRequest {
    let size = NonZeroUsize::new(size).expect("non-zero page size");
    PageRequest::new(size, number)
}

fn everything() -> PageRequest {
    request(100, 0)
}

struct Shelf {
    owner: UserId,
    catalogue: InMemoryCatalogue,
    dear_milk: Product,
    cheap_milk: Product,
    oat_milk: Product,
    butter: Product,
    pancakes: Dish,
    porridge: Dish,
    breakfast: Menu,
}

#[fixture]
fn shelf() -> Shelf {
    let owner = UserId::random();
    let dear_milk = ProductBuilder::new(owner)
        .shop("Deli")
        .category("Dairy")
        .price("3")
        .tags(&["milk", "whole"])
        .build();
    let cheap_milk = ProductBuilder::new(owner)
        .shop("Market")
        .category("Dairy")
        .price("1")
        .tags(&["milk"])
        .build();
    let oat_milk = ProductBuilder::new(owner)
        .shop("Market")
        .category("Plant")
        .price("2")
        .tags(&["milk", "vegan"])
        .build();
    let butter = ProductBuilder::new(owner)
        .shop("Deli")
        .category("Dairy")
        .price("2")
        .tags(&["butter"])
        .build();
    let pancakes = dish(
        owner,
        "Pancakes",
        vec![
            ingredient("milk", tags_filter(&["milk"]), "0.3"),
            ingredient("butter", tags_filter(&["butter"]), "0.05"),
        ],
    );
    let porridge = dish(
        owner,
        "Porridge",
        vec![ingredient("milk", tags_filter(&["milk"]), "0.5")],
    );
    let breakfast = menu(owner, "Breakfast", &[(&porridge, "1")]);

    let catalogue = InMemoryCatalogue::from_document(CatalogueDocument {
        products: vec![
            dear_milk.clone(),
            cheap_milk.clone(),
            oat_milk.clone(),
            butter.clone(),
        ],
        dishes: vec![pancakes.clone(), porridge.clone()],
        menus: vec![breakfast.clone()],
    })
    .expect("valid catalogue");

    Shelf {
        owner,
        catalogue,
        dear_milk,
        cheap_milk,
        oat_milk,
        butter,
        pancakes,
        porridge,
        breakfast,
    }
}

fn shop(values: &[&str]) -> FilterTree {
    FilterTree::any_shop(values.iter().copied()).expect("valid shop filter")
}

fn category(values: &[&str]) -> FilterTree {
    FilterTree::any_category(values.iter().copied()).expect("valid category filter")
}

async fn product_ids(catalogue: &InMemoryCatalogue, filter: &FilterTree) -> Vec<ProductId> {
    let sort = SortSpec::ascending(ProductField::Price);
    ProductRepository::page(catalogue, filter, &sort, everything())
        .await
        .expect("page succeeds")
        .content()
        .iter()
        .map(Product::id)
        .collect()
}

#[rstest]
#[tokio::test]
async fn and_intersects_operand_sets(shelf: Shelf) {
    let filter = FilterTree::and([shop(&["Market"]), category(&["Dairy"])]).expect("valid and");

    let ids = product_ids(&shelf.catalogue, &filter).await;

    assert_eq!(ids, vec![shelf.cheap_milk.id()]);
}

#[rstest]
#[tokio::test]
async fn or_unites_operand_sets(shelf: Shelf) {
    let filter = FilterTree::or([shop(&["Deli"]), category(&["Plant"])]).expect("valid or");

    let ids = product_ids(&shelf.catalogue, &filter).await;

    assert_eq!(ids.len(), 3);
    assert_eq!(ids.last(), Some(&shelf.dear_milk.id()));
    assert!(ids.contains(&shelf.oat_milk.id()));
    assert!(ids.contains(&shelf.butter.id()));
}

#[rstest]
#[tokio::test]
async fn or_else_prefers_a_non_empty_primary(shelf: Shelf) {
    let exact = FilterTree::and([shop(&["Deli"]), tags_filter(&["milk"])]).expect("valid and");
    let filter = FilterTree::or_else(exact, tags_filter(&["milk"]));

    let ids = product_ids(&shelf.catalogue, &filter).await;

    assert_eq!(ids, vec![shelf.dear_milk.id()]);
}

#[rstest]
#[tokio::test]
async fn or_else_falls_back_when_the_primary_is_empty(shelf: Shelf) {
    let exact = FilterTree::and([shop(&["Nowhere"]), tags_filter(&["milk"])]).expect("valid and");
    let filter = FilterTree::or_else(exact, tags_filter(&["milk"]));

    let ids = product_ids(&shelf.catalogue, &filter).await;

    assert_eq!(
        ids,
        vec![shelf.cheap_milk.id(), shelf.oat_milk.id(), shelf.dear_milk.id()]
    );
}

#[rstest]
#[tokio::test]
async fn scoped_or_else_falls_back_within_the_conjunction(shelf: Shelf) {
    let stranger = ProductBuilder::new(UserId::random())
        .shop("Corner")
        .price("0.5")
        .tags(&["organic", "milk"])
        .build();
    let mut products = shelf
        .catalogue
        .replace_products(Vec::new())
        .expect("replace succeeds");
    products.push(stranger.clone());
    shelf
        .catalogue
        .replace_products(products)
        .expect("replace succeeds");

    let filter = FilterTree::and([
        FilterTree::by_user(shelf.owner),
        FilterTree::or_else(tags_filter(&["organic"]), tags_filter(&["vegan"])),
    ])
    .expect("valid and");
    let unscoped = FilterTree::or_else(tags_filter(&["organic"]), tags_filter(&["vegan"]));

    let scoped_ids = product_ids(&shelf.catalogue, &filter).await;
    let scoped_count = ProductRepository::count(&shelf.catalogue, &filter)
        .await
        .expect("count succeeds");

    assert_eq!(scoped_ids, vec![shelf.oat_milk.id()]);
    assert_eq!(scoped_count, 1);
    assert_eq!(
        product_ids(&shelf.catalogue, &unscoped).await,
        vec![stranger.id()]
    );
}

#[rstest]
#[tokio::test]
async fn or_else_inside_a_disjunction_respects_the_enclosing_scope(shelf: Shelf) {
    let stranger = ProductBuilder::new(UserId::random())
        .tags(&["organic"])
        .build();
    let mut products = shelf
        .catalogue
        .replace_products(Vec::new())
        .expect("replace succeeds");
    products.push(stranger);
    shelf
        .catalogue
        .replace_products(products)
        .expect("replace succeeds");

    let filter = FilterTree::and([
        FilterTree::by_user(shelf.owner),
        FilterTree::or([
            tags_filter(&["butter"]),
            FilterTree::or_else(tags_filter(&["organic"]), tags_filter(&["vegan"])),
        ])
        .expect("valid or"),
    ])
    .expect("valid and");

    let ids = product_ids(&shelf.catalogue, &filter).await;

    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&shelf.oat_milk.id()));
    assert!(ids.contains(&shelf.butter.id()));
}

#[rstest]
#[tokio::test]
async fn owner_scoped_ingredients_fall_back_to_their_owners_products() {
    let alice = UserId::random();
    let bob = UserId::random();
    let alice_milk = ProductBuilder::new(alice).tags(&["milk"]).build();
    let bob_milk = ProductBuilder::new(bob)
        .price("0.5")
        .tags(&["whole milk"])
        .build();
    let catalogue = InMemoryCatalogue::from_document(CatalogueDocument {
        products: vec![alice_milk.clone(), bob_milk],
        ..CatalogueDocument::default()
    })
    .expect("valid catalogue");
    let filter = FilterTree::and([
        FilterTree::by_user(alice),
        FilterTree::or_else(tags_filter(&["whole milk"]), tags_filter(&["milk"])),
    ])
    .expect("valid and");

    let selected = ingredient("milk", filter, "0.2")
        .resolve_candidate(&catalogue, 0)
        .await
        .expect("resolution succeeds");

    assert_eq!(selected.map(|product| product.id()), Some(alice_milk.id()));
}

#[rstest]
#[tokio::test]
async fn min_tags_requires_every_tag(shelf: Shelf) {
    let ids = product_ids(&shelf.catalogue, &tags_filter(&["milk", "vegan"])).await;

    assert_eq!(ids, vec![shelf.oat_milk.id()]);
}

#[rstest]
#[tokio::test]
async fn owner_filters_select_only_that_users_entities(shelf: Shelf) {
    let mine = ProductRepository::count(&shelf.catalogue, &FilterTree::by_user(shelf.owner))
        .await
        .expect("count succeeds");
    let theirs = ProductRepository::count(&shelf.catalogue, &FilterTree::by_user(UserId::random()))
        .await
        .expect("count succeeds");

    assert_eq!((mine, theirs), (4, 0));
}

#[rstest]
#[tokio::test]
async fn product_attributes_match_no_dishes(shelf: Shelf) {
    let count = DishRepository::count(&shelf.catalogue, &shop(&["Deli"]))
        .await
        .expect("count succeeds");

    assert_eq!(count, 0);
}

#[rstest]
#[tokio::test]
async fn dishes_match_by_ingredient_name_and_menu(shelf: Shelf) {
    let sort = SortSpec::ascending(DishField::Name);
    let by_ingredient = FilterTree::any_ingredient(["butter"]).expect("valid filter");
    let by_menu = FilterTree::any_menu(["Breakfast"]).expect("valid filter");

    let buttery = DishRepository::page(&shelf.catalogue, &by_ingredient, &sort, everything())
        .await
        .expect("page succeeds");
    let served = DishRepository::page(&shelf.catalogue, &by_menu, &sort, everything())
        .await
        .expect("page succeeds");

    assert_eq!(buttery.content(), [shelf.pancakes.clone()].as_slice());
    assert_eq!(served.content(), [shelf.porridge.clone()].as_slice());
}

#[rstest]
#[tokio::test]
async fn menus_match_by_the_dishes_they_serve(shelf: Shelf) {
    let sort = SortSpec::ascending(MenuField::Name);
    let porridge = FilterTree::any_dish(["Porridge"]).expect("valid filter");
    let pancakes = FilterTree::any_dish(["Pancakes"]).expect("valid filter");

    let with_porridge = MenuRepository::page(&shelf.catalogue, &porridge, &sort, everything())
        .await
        .expect("page succeeds");
    let with_pancakes = MenuRepository::count(&shelf.catalogue, &pancakes)
        .await
        .expect("count succeeds");

    assert_eq!(with_porridge.content(), [shelf.breakfast.clone()].as_slice());
    assert_eq!(with_pancakes, 0);
}

#[rstest]
#[tokio::test]
async fn sort_keys_apply_in_order(shelf: Shelf) {
    let sort = SortSpec::new(vec![
        (ProductField::Shop, Direction::Descending),
        (ProductField::Price, Direction::Ascending),
    ])
    .expect("valid sort");

    let page = ProductRepository::page(&shelf.catalogue, &tags_filter(&["milk"]), &sort, everything())
        .await
        .expect("page succeeds");
    let ids: Vec<_> = page.content().iter().map(Product::id).collect();

    assert_eq!(
        ids,
        vec![shelf.cheap_milk.id(), shelf.oat_milk.id(), shelf.dear_milk.id()]
    );
}

#[rstest]
#[tokio::test]
async fn pages_past_the_end_are_clamped_to_the_last(shelf: Shelf) {
    let sort = SortSpec::ascending(ProductField::Price);
    let all = FilterTree::by_user(shelf.owner);

    let page = ProductRepository::page(&shelf.catalogue, &all, &sort, request(3, 9))
        .await
        .expect("page succeeds");

    assert_eq!(page.metadata().current_page(), 1);
    assert_eq!(page.metadata().total_items(), 4);
    assert_eq!(page.content(), [shelf.dear_milk.clone()].as_slice());
}

#[rstest]
#[tokio::test]
async fn projections_count_distinct_values(shelf: Shelf) {
    let all = FilterTree::by_user(shelf.owner);

    let shops = ProductRepository::projected_page(
        &shelf.catalogue,
        &all,
        ProductProjection::Shop,
        everything(),
    )
    .await
    .expect("projection succeeds");
    let tag_count =
        ProductRepository::projected_count(&shelf.catalogue, &all, ProductProjection::Tag)
            .await
            .expect("projection succeeds");

    assert_eq!(
        shops.content(),
        [ProjectedValue::new("Deli", 2), ProjectedValue::new("Market", 2)].as_slice()
    );
    assert_eq!(tag_count, 4);
}

#[rstest]
#[tokio::test]
async fn dish_projections_list_ingredient_names(shelf: Shelf) {
    let all = FilterTree::by_user(shelf.owner);

    let names = DishRepository::projected_page(
        &shelf.catalogue,
        &all,
        DishProjection::IngredientName,
        everything(),
    )
    .await
    .expect("projection succeeds");

    assert_eq!(
        names.content(),
        [ProjectedValue::new("butter", 1), ProjectedValue::new("milk", 2)].as_slice()
    );
}

#[rstest]
#[tokio::test]
async fn lookups_by_id_find_stored_entities(shelf: Shelf) {
    let dish = DishRepository::find_by_id(&shelf.catalogue, &shelf.pancakes.id())
        .await
        .expect("lookup succeeds");
    let missing = MenuRepository::find_by_id(&shelf.catalogue, &MenuId::random())
        .await
        .expect("lookup succeeds");

    assert_eq!(dish.as_ref(), Some(&shelf.pancakes));
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test]
async fn replaced_products_are_seen_by_the_next_call(shelf: Shelf) {
    let first = shelf
        .porridge
        .product(&shelf.catalogue, 0, 0)
        .await
        .expect("resolution succeeds");

    let cheaper = ProductBuilder::new(shelf.owner)
        .price("0.5")
        .tags(&["milk"])
        .build();
    let previous = shelf
        .catalogue
        .replace_products(vec![cheaper.clone(), shelf.cheap_milk.clone()])
        .expect("replace succeeds");
    let second = shelf
        .porridge
        .product(&shelf.catalogue, 0, 0)
        .await
        .expect("resolution succeeds");

    assert_eq!(previous.len(), 4);
    assert_eq!(first.map(|p| p.id()), Some(shelf.cheap_milk.id()));
    assert_eq!(second.map(|p| p.id()), Some(cheaper.id()));
}

#[rstest]
fn duplicate_ids_are_rejected(shelf: Shelf) {
    let result = InMemoryCatalogue::from_document(CatalogueDocument {
        products: vec![shelf.butter.clone(), shelf.butter.clone()],
        ..CatalogueDocument::default()
    });

    assert!(matches!(
        result,
        Err(CatalogueLoadError::DuplicateId { kind: "product", .. })
    ));
}

#[rstest]
fn menus_must_refer_to_known_dishes(shelf: Shelf) {
    let result = InMemoryCatalogue::from_document(CatalogueDocument {
        menus: vec![shelf.breakfast.clone()],
        ..CatalogueDocument::default()
    });

    assert!(matches!(
        result,
        Err(CatalogueLoadError::UnknownDish { dish_id, .. }) if dish_id == shelf.porridge.id()
    ));
}

#[rstest]
fn menus_must_refer_to_their_owners_dishes(shelf: Shelf) {
    let stranger = UserId::random();
    let foreign = menu(stranger, "Borrowed", &[(&shelf.porridge, "1")]);

    let result = InMemoryCatalogue::from_document(CatalogueDocument {
        dishes: vec![shelf.porridge.clone()],
        menus: vec![foreign],
        ..CatalogueDocument::default()
    });

    assert!(matches!(result, Err(CatalogueLoadError::ForeignDish { .. })));
}

#[test]
fn json_documents_are_validated() {
    let owner = UserId::random();
    let document = serde_json::json!({
        "products": [{
            "id": ProductId::random(),
            "owner": owner,
            "category": "Dairy",
            "shop": "Market",
            "grade": "A",
            "manufacturer": "Acme",
            "unit": "l",
            "price": "1.10",
            "packageSize": "0",
            "availableQuantity": "0",
        }],
    });

    let result = InMemoryCatalogue::from_json(&document.to_string());

    assert!(matches!(result, Err(CatalogueLoadError::Document(_))));
}

#[test]
fn empty_documents_load() {
    let catalogue = InMemoryCatalogue::from_json("{}").expect("empty catalogue");
    let contents = catalogue.read().expect("readable");
    assert!(contents.products.is_empty());
    assert!(contents.dishes.is_empty());
    assert!(contents.menus.is_empty());
}
