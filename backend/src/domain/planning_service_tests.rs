//! Tests for the menu planning service.

use std::sync::Arc;

use mockall::predicate::eq;
use pagination::Page;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockDishRepository, MockMenuRepository, MockProductRepository, RepositoryError,
};
use crate::domain::{Dish, ErrorCode, Menu, ProductId, UserId};
use crate::test_support::{ProductBuilder, dec, dish, ingredient, menu, tags_filter};

type MockService = MenuPlanningService<MockProductRepository, MockDishRepository, MockMenuRepository>;

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

struct Pantry {
    oats: Product,
    milk: Product,
    porridge: Dish,
    weekly: Menu,
}

#[fixture]
fn pantry(owner: UserId) -> Pantry {
    let oats = ProductBuilder::new(owner)
        .tags(&["oats"])
        .price("2")
        .package_size("0.5")
        .available("0.2")
        .build();
    let milk = ProductBuilder::new(owner)
        .tags(&["milk"])
        .price("1.5")
        .available("4")
        .build();
    let porridge = dish(
        owner,
        "Porridge",
        vec![
            ingredient("oats", tags_filter(&["oats"]), "0.1"),
            ingredient("milk", tags_filter(&["milk"]), "0.25"),
        ],
    );
    let weekly = menu(owner, "Weekly", &[(&porridge, "7")]);
    Pantry {
        oats,
        milk,
        porridge,
        weekly,
    }
}

impl Pantry {
    fn service(&self) -> MockService {
        let oats = self.oats.clone();
        let milk = self.milk.clone();
        let mut products = MockProductRepository::new();
        products.expect_page().returning(move |filter, _, request| {
            let matching = if *filter == tags_filter(&["oats"]) {
                vec![oats.clone()]
            } else if *filter == tags_filter(&["milk"]) {
                vec![milk.clone()]
            } else {
                Vec::new()
            };
            Ok(Page::paginate(matching, request))
        });

        let porridge = self.porridge.clone();
        let mut dishes = MockDishRepository::new();
        dishes
            .expect_find_by_id()
            .returning(move |dish_id| Ok((*dish_id == porridge.id()).then(|| porridge.clone())));

        let weekly = self.weekly.clone();
        let mut menus = MockMenuRepository::new();
        menus
            .expect_find_by_id()
            .returning(move |menu_id| Ok((*menu_id == weekly.id()).then(|| weekly.clone())));

        MenuPlanningService::new(
            Arc::new(products),
            Arc::new(dishes),
            Arc::new(menus),
            NumericConfig::default(),
        )
    }
}

#[rstest]
#[tokio::test]
async fn shortfall_report_lists_products_in_first_appearance_order(pantry: Pantry) {
    let service = pantry.service();

    let report = service
        .shortfall_report(&pantry.weekly.id(), dec("2"), &[])
        .await
        .expect("report succeeds");

    assert_eq!(report.menu_id, pantry.weekly.id());
    let products: Vec<ProductId> = report.lines.iter().map(|line| line.product.id()).collect();
    assert_eq!(products, vec![pantry.oats.id(), pantry.milk.id()]);

    // oats: 0.1 * 7 * 2 = 1.4 needed, 0.2 on hand
    let oats = &report.lines[0];
    assert_eq!(oats.necessary_quantity, dec("1.4"));
    assert_eq!(oats.lack_quantity, dec("1.2"));
    assert_eq!(oats.lack_quantity_price, dec("2.4"));

    // milk: 0.25 * 7 * 2 = 3.5 needed, 4 on hand
    let milk = &report.lines[1];
    assert_eq!(milk.necessary_quantity, dec("3.5"));
    assert!(milk.lack_quantity.is_zero());

    assert_eq!(report.total_lack_price, Some(dec("2.4")));
    assert_eq!(
        report.total_lack_price.map(|price| price.to_string()),
        Some("2.400000".to_owned())
    );
}

#[rstest]
#[tokio::test]
async fn shortfall_report_without_candidates_has_no_total(owner: UserId) {
    let lonely = dish(
        owner,
        "Mystery",
        vec![ingredient("unobtainium", tags_filter(&["unobtainium"]), "1")],
    );
    let weekly = menu(owner, "Weekly", &[(&lonely, "1")]);
    let menu_id = weekly.id();

    let mut products = MockProductRepository::new();
    products
        .expect_page()
        .returning(|_, _, request| Ok(Page::empty(request.size())));
    let mut dishes = MockDishRepository::new();
    dishes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(lonely)));
    let mut menus = MockMenuRepository::new();
    menus
        .expect_find_by_id()
        .with(eq(menu_id))
        .return_once(move |_| Ok(Some(weekly)));

    let service = MenuPlanningService::new(
        Arc::new(products),
        Arc::new(dishes),
        Arc::new(menus),
        NumericConfig::default(),
    );
    let report = service
        .shortfall_report(&menu_id, dec("1"), &[])
        .await
        .expect("report succeeds");

    assert!(report.lines.is_empty());
    assert_eq!(report.total_lack_price, None);
}

#[rstest]
#[tokio::test]
async fn unknown_menus_are_not_found(pantry: Pantry) {
    let service = pantry.service();
    let missing = MenuId::random();

    let err = service
        .shortfall_report(&missing, dec("1"), &[])
        .await
        .expect_err("menu is unknown");

    assert!(matches!(err, PlanningError::MenuNotFound { menu_id } if menu_id == missing));
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn menu_repository_failures_propagate() {
    let mut menus = MockMenuRepository::new();
    menus
        .expect_find_by_id()
        .return_once(|_| Err(RepositoryError::connection("menus offline")));
    let service = MenuPlanningService::new(
        Arc::new(MockProductRepository::new()),
        Arc::new(MockDishRepository::new()),
        Arc::new(menus),
        NumericConfig::default(),
    );

    let err = service
        .menu_item_products(&MenuId::random(), dec("1"), &[])
        .await
        .expect_err("repository failure");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn dish_shortfall_subtracts_one_package(pantry: Pantry) {
    let service = pantry.service();

    let shortfall = service
        .dish_shortfall(&pantry.porridge.id(), 0, 0, dec("10"))
        .await
        .expect("shortfall succeeds")
        .expect("oats resolve");

    assert_eq!(shortfall.product.id(), pantry.oats.id());
    assert_eq!(shortfall.necessary_quantity, dec("1"));
    assert_eq!(shortfall.lack_quantity, dec("0.5"));
    assert_eq!(shortfall.lack_quantity_price, dec("1"));
}

#[rstest]
#[tokio::test]
async fn dish_shortfall_rejects_unknown_ordinals(pantry: Pantry) {
    let service = pantry.service();

    let err = service
        .dish_shortfall(&pantry.porridge.id(), 2, 0, dec("1"))
        .await
        .expect_err("ordinal out of range");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn dish_shortfall_reports_unknown_dishes(pantry: Pantry) {
    let service = pantry.service();
    let missing = DishId::random();

    let err = service
        .dish_shortfall(&missing, 0, 0, dec("1"))
        .await
        .expect_err("dish is unknown");

    assert!(matches!(err, PlanningError::DishNotFound { dish_id } if dish_id == missing));
}
