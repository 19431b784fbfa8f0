// core/tests/relation_tests.rs
mod common;

use common::*;
use foodgram::relation::{add_recipe_relation, apply_relation_change, remove_recipe_relation};
use foodgram::store::{RecipeStore, RelationStore};
use foodgram::{CoreError, RelationChange, RelationKind};

#[tokio::test]
async fn add_then_remove_returns_to_absent() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, _) = kitchen.pancakes_and_bread().await;

  for kind in RelationKind::ALL {
    let summary = add_recipe_relation(&kitchen.store, kind, kitchen.bob.id, a).await.unwrap();
    assert_eq!(summary.id, a);
    assert_eq!(summary.name, "A");
    remove_recipe_relation(&kitchen.store, kind, kitchen.bob.id, a).await.unwrap();
    assert!(!kitchen.store.remove_relation(kind, kitchen.bob.id, a).await.unwrap());
  }
}

#[tokio::test]
async fn adding_twice_is_a_duplicate() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, _) = kitchen.pancakes_and_bread().await;

  for kind in RelationKind::ALL {
    add_recipe_relation(&kitchen.store, kind, kitchen.bob.id, a).await.unwrap();
    let err = add_recipe_relation(&kitchen.store, kind, kitchen.bob.id, a).await.unwrap_err();
    assert!(
      matches!(err, CoreError::DuplicateRelation { kind: k, recipe_id } if k == kind && recipe_id == a),
      "unexpected error for {kind:?}: {err}"
    );
  }
}

#[tokio::test]
async fn removing_twice_is_missing() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, _) = kitchen.pancakes_and_bread().await;

  apply_relation_change(&kitchen.store, RelationKind::ShoppingCart, RelationChange::Add, kitchen.bob.id, a)
    .await
    .unwrap();
  apply_relation_change(&kitchen.store, RelationKind::ShoppingCart, RelationChange::Remove, kitchen.bob.id, a)
    .await
    .unwrap();
  let err = apply_relation_change(&kitchen.store, RelationKind::ShoppingCart, RelationChange::Remove, kitchen.bob.id, a)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::MissingRelation { kind: RelationKind::ShoppingCart, .. }));
}

#[tokio::test]
async fn favorite_and_cart_are_independent() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, _) = kitchen.pancakes_and_bread().await;

  add_recipe_relation(&kitchen.store, RelationKind::Favorite, kitchen.bob.id, a).await.unwrap();
  add_recipe_relation(&kitchen.store, RelationKind::ShoppingCart, kitchen.bob.id, a).await.unwrap();

  let details = kitchen.store.recipe_details(a, Some(kitchen.bob.id)).await.unwrap().unwrap();
  assert!(details.is_favorited);
  assert!(details.is_in_shopping_cart);

  remove_recipe_relation(&kitchen.store, RelationKind::Favorite, kitchen.bob.id, a).await.unwrap();
  let details = kitchen.store.recipe_details(a, Some(kitchen.bob.id)).await.unwrap().unwrap();
  assert!(!details.is_favorited);
  assert!(details.is_in_shopping_cart);

  let as_ann = kitchen.store.recipe_details(a, Some(kitchen.ann.id)).await.unwrap().unwrap();
  assert!(!as_ann.is_in_shopping_cart);
}

#[tokio::test]
async fn unknown_recipe_is_not_found() {
  setup_tracing();
  let kitchen = Kitchen::new();

  let add = add_recipe_relation(&kitchen.store, RelationKind::Favorite, kitchen.bob.id, 999).await;
  assert!(matches!(add, Err(CoreError::NotFound { entity: "Recipe", id: 999 })));
  let remove = remove_recipe_relation(&kitchen.store, RelationKind::ShoppingCart, kitchen.bob.id, 999).await;
  assert!(matches!(remove, Err(CoreError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_insert_exactly_once() {
  setup_tracing();
  let kitchen = Kitchen::new();
  let (a, _) = kitchen.pancakes_and_bread().await;
  let bob = kitchen.bob.id;
  let store = std::sync::Arc::new(kitchen.store);

  for kind in RelationKind::ALL {
    let handles: Vec<_> = (0..16)
      .map(|_| {
        let store = store.clone();
        tokio::spawn(async move { apply_relation_change(&*store, kind, RelationChange::Add, bob, a).await })
      })
      .collect();

    let mut added = 0;
    let mut duplicates = 0;
    for handle in handles {
      match handle.await.unwrap() {
        Ok(()) => added += 1,
        Err(CoreError::DuplicateRelation { .. }) => duplicates += 1,
        Err(other) => panic!("Unexpected error: {:?}", other),
      }
    }
    assert_eq!((added, duplicates), (1, 15), "{kind}");
    assert!(store.remove_relation(kind, bob, a).await.unwrap());
  }
}
