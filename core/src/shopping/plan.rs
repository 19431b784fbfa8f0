// core/src/shopping/plan.rs

use super::aggregate::IngredientTotals;
use crate::model::{CartLine, IngredientKey};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One ingredient of the shopping list with the recipes that need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientBlock {
  pub ingredient: IngredientKey,
  pub total: i64,
  pub recipes: Vec<String>,
}

/// Ordered input of the document renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingPlan {
  pub blocks: Vec<IngredientBlock>,
}

impl ShoppingPlan {
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }
}

/// Re-walks the raw lines in source order: one block per ingredient in order of
/// first appearance, each listing its contributing recipes in order of first
/// appearance within that ingredient.
pub fn build_plan(lines: &[CartLine], totals: &IngredientTotals) -> ShoppingPlan {
  let mut blocks: Vec<IngredientBlock> = Vec::new();
  let mut block_index: HashMap<&IngredientKey, usize> = HashMap::new();
  let mut seen_recipes: Vec<HashSet<&str>> = Vec::new();

  for line in lines {
    let index = *block_index.entry(&line.ingredient).or_insert_with(|| {
      blocks.push(IngredientBlock {
        ingredient: line.ingredient.clone(),
        total: totals.get(&line.ingredient).copied().unwrap_or(0),
        recipes: Vec::new(),
      });
      seen_recipes.push(HashSet::new());
      blocks.len() - 1
    });
    if seen_recipes[index].insert(line.recipe_name.as_str()) {
      blocks[index].recipes.push(line.recipe_name.clone());
    }
  }

  ShoppingPlan { blocks }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::shopping::sum_by_ingredient;

  fn plan_of(lines: &[CartLine]) -> ShoppingPlan {
    build_plan(lines, &sum_by_ingredient(lines))
  }

  fn summary(plan: &ShoppingPlan) -> Vec<(&str, i64, Vec<&str>)> {
    plan
      .blocks
      .iter()
      .map(|b| (b.ingredient.name.as_str(), b.total, b.recipes.iter().map(String::as_str).collect()))
      .collect()
  }

  #[test]
  fn groups_recipes_under_ingredients_in_first_seen_order() {
    let lines = vec![
      CartLine::new("Flour", "g", "A", 200),
      CartLine::new("Flour", "g", "B", 100),
      CartLine::new("Sugar", "g", "A", 50),
      CartLine::new("Egg", "pcs", "B", 2),
    ];
    assert_eq!(
      summary(&plan_of(&lines)),
      vec![("Flour", 300, vec!["A", "B"]), ("Sugar", 50, vec!["A"]), ("Egg", 2, vec!["B"])]
    );
  }

  #[test]
  fn interleaved_lines_still_land_in_their_own_block() {
    let lines = vec![
      CartLine::new("Flour", "g", "A", 200),
      CartLine::new("Sugar", "g", "A", 50),
      CartLine::new("Flour", "g", "B", 100),
    ];
    assert_eq!(
      summary(&plan_of(&lines)),
      vec![("Flour", 300, vec!["A", "B"]), ("Sugar", 50, vec!["A"])]
    );
  }

  #[test]
  fn recipe_is_listed_once_per_block() {
    let lines = vec![
      CartLine::new("Salt", "g", "Soup", 5),
      CartLine::new("Salt", "g", "Soup", 3),
      CartLine::new("Salt", "g", "Bread", 2),
    ];
    assert_eq!(summary(&plan_of(&lines)), vec![("Salt", 10, vec!["Soup", "Bread"])]);
  }

  #[test]
  fn order_is_insertion_not_alphabetical_or_by_total() {
    let lines = vec![
      CartLine::new("Zucchini", "pcs", "Stew", 1),
      CartLine::new("Apple", "pcs", "Pie", 9),
    ];
    let names: Vec<_> = plan_of(&lines).blocks.into_iter().map(|b| b.ingredient.name).collect();
    assert_eq!(names, vec!["Zucchini", "Apple"]);
  }

  #[test]
  fn no_lines_no_blocks() {
    assert!(plan_of(&[]).is_empty());
  }
}
