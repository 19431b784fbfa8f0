// core/tests/shopping_list_tests.rs
mod common;

use chrono::NaiveDate;
use common::*;
use foodgram::model::IngredientKey;
use foodgram::render::{layout, render_shopping_list, ListHeader};
use foodgram::shopping::{build_plan, collect_cart_lines, sum_by_ingredient};
use foodgram::store::RelationStore;
use foodgram::{CoreError, RelationKind};

fn header() -> ListHeader {
  ListHeader {
    full_name: "Ann Baker".into(),
    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
  }
}

#[tokio::test]
async fn cart_of_two_recipes_totals_and_groups() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, b) = kitchen.pancakes_and_bread().await;
  let store = &kitchen.store;
  store.insert_relation(RelationKind::ShoppingCart, kitchen.bob.id, a).await.unwrap();
  store.insert_relation(RelationKind::ShoppingCart, kitchen.bob.id, b).await.unwrap();

  let lines = collect_cart_lines(store, kitchen.bob.id).await.unwrap();
  let totals = sum_by_ingredient(&lines);
  assert_eq!(totals[&IngredientKey::new("Flour", "g")], 300);
  assert_eq!(totals[&IngredientKey::new("Sugar", "g")], 50);
  assert_eq!(totals[&IngredientKey::new("Egg", "pcs")], 2);

  let plan = build_plan(&lines, &totals);
  let blocks: Vec<_> = plan
    .blocks
    .iter()
    .map(|b| (b.ingredient.name.as_str(), b.total, b.recipes.clone()))
    .collect();
  assert_eq!(
    blocks,
    vec![
      ("Flour", 300, vec!["A".to_string(), "B".to_string()]),
      ("Sugar", 50, vec!["A".to_string()]),
      ("Egg", 2, vec!["B".to_string()]),
    ]
  );
}

#[tokio::test]
async fn empty_cart_fails_before_rendering() {
  setup_tracing();
  let kitchen = Kitchen::new();
  kitchen.pancakes_and_bread().await;

  let err = collect_cart_lines(&kitchen.store, kitchen.bob.id).await.unwrap_err();
  assert!(matches!(err, CoreError::EmptyCart));
}

#[tokio::test]
async fn favorites_do_not_leak_into_the_cart() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, _) = kitchen.pancakes_and_bread().await;
  kitchen
    .store
    .insert_relation(RelationKind::Favorite, kitchen.bob.id, a)
    .await
    .unwrap();

  assert!(matches!(
    collect_cart_lines(&kitchen.store, kitchen.bob.id).await,
    Err(CoreError::EmptyCart)
  ));
}

#[tokio::test]
async fn carts_are_per_user() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, b) = kitchen.pancakes_and_bread().await;
  let store = &kitchen.store;
  store.insert_relation(RelationKind::ShoppingCart, kitchen.ann.id, a).await.unwrap();
  store.insert_relation(RelationKind::ShoppingCart, kitchen.bob.id, b).await.unwrap();

  let lines = collect_cart_lines(store, kitchen.ann.id).await.unwrap();
  assert!(lines.iter().all(|l| l.recipe_name == "A"));
  assert_eq!(sum_by_ingredient(&lines)[&IngredientKey::new("Flour", "g")], 200);
}

#[tokio::test]
async fn rendered_document_is_a_pdf_with_the_planned_pages() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, b) = kitchen.pancakes_and_bread().await;
  let store = &kitchen.store;
  store.insert_relation(RelationKind::ShoppingCart, kitchen.ann.id, a).await.unwrap();
  store.insert_relation(RelationKind::ShoppingCart, kitchen.ann.id, b).await.unwrap();

  let lines = collect_cart_lines(store, kitchen.ann.id).await.unwrap();
  let plan = build_plan(&lines, &sum_by_ingredient(&lines));
  let pages = layout(&header(), &plan);
  let bytes = render_shopping_list(&header(), &plan).unwrap();

  assert!(bytes.starts_with(b"%PDF"));
  let doc = lopdf::Document::load_mem(&bytes).unwrap();
  assert_eq!(doc.get_pages().len(), pages.len());

  let texts: Vec<_> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
  assert!(texts.contains(&"User: Ann Baker"));
  assert!(texts.contains(&"--Flour - 300 g"));
  assert!(texts.contains(&"Recipe: B"));
}

#[test]
fn empty_plan_renders_a_single_title_page() {
  let bytes = render_shopping_list(&header(), &Default::default()).unwrap();
  let doc = lopdf::Document::load_mem(&bytes).unwrap();
  assert_eq!(doc.get_pages().len(), 1);
}

#[tokio::test]
async fn cyrillic_shopping_list_survives_rendering() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let ivan = kitchen.store.add_user("ivan", "Иван", "Петров");
  let flour = kitchen.store.add_ingredient("Мука", "г").unwrap();
  let blini = kitchen.recipe(&kitchen.ann, "Блины", &[(&flour, 300)]).await;
  kitchen
    .store
    .insert_relation(RelationKind::ShoppingCart, ivan.id, blini)
    .await
    .unwrap();

  let lines = collect_cart_lines(&kitchen.store, ivan.id).await.unwrap();
  let plan = build_plan(&lines, &sum_by_ingredient(&lines));
  let header = ListHeader {
    full_name: ivan.full_name(),
    date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
  };
  let bytes = render_shopping_list(&header, &plan).unwrap();

  let doc = lopdf::Document::load_mem(&bytes).unwrap();
  let text = doc.extract_text(&[1]).unwrap();
  assert!(text.contains("User: Иван Петров"), "{text}");
  assert!(text.contains("--Мука - 300 г"), "{text}");
  assert!(text.contains("Recipe: Блины"), "{text}");
  assert!(!text.contains('?'), "{text}");
}
