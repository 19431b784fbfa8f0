// core/src/shopping/aggregate.rs

use crate::error::{CoreError, CoreResult};
use crate::model::{CartLine, IngredientKey, UserId};
use crate::store::RelationStore;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Total amount per ingredient identity.
pub type IngredientTotals = HashMap<IngredientKey, i64>;

/// Every cart line of `user`, in store order. Fails with `EmptyCart` when the
/// cart holds nothing, so rendering never starts for an empty cart.
#[instrument(name = "shopping::collect_cart_lines", skip(store))]
pub async fn collect_cart_lines<S>(store: &S, user: UserId) -> CoreResult<Vec<CartLine>>
where
  S: RelationStore + ?Sized,
{
  let lines = store.cart_lines(user).await?;
  if lines.is_empty() {
    debug!("Cart is empty.");
    return Err(CoreError::EmptyCart);
  }
  debug!(lines = lines.len(), "Cart lines collected.");
  Ok(lines)
}

/// Sums `amount` per (name, unit). Order of `lines` does not affect the result.
pub fn sum_by_ingredient(lines: &[CartLine]) -> IngredientTotals {
  let mut totals = IngredientTotals::with_capacity(lines.len());
  for line in lines {
    *totals.entry(line.ingredient.clone()).or_insert(0) += i64::from(line.amount);
  }
  totals
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lines() -> Vec<CartLine> {
    vec![
      CartLine::new("Flour", "g", "Pancakes", 200),
      CartLine::new("Sugar", "g", "Pancakes", 50),
      CartLine::new("Flour", "g", "Bread", 100),
      CartLine::new("Egg", "pcs", "Bread", 2),
    ]
  }

  #[test]
  fn sums_per_ingredient() {
    let totals = sum_by_ingredient(&lines());
    assert_eq!(totals.len(), 3);
    assert_eq!(totals[&IngredientKey::new("Flour", "g")], 300);
    assert_eq!(totals[&IngredientKey::new("Sugar", "g")], 50);
    assert_eq!(totals[&IngredientKey::new("Egg", "pcs")], 2);
  }

  #[test]
  fn order_does_not_change_totals() {
    let mut reversed = lines();
    reversed.reverse();
    assert_eq!(sum_by_ingredient(&reversed), sum_by_ingredient(&lines()));
  }

  #[test]
  fn same_name_with_other_unit_stays_apart() {
    let totals = sum_by_ingredient(&[
      CartLine::new("Milk", "ml", "Porridge", 300),
      CartLine::new("Milk", "cup", "Cocoa", 1),
    ]);
    assert_eq!(totals[&IngredientKey::new("Milk", "ml")], 300);
    assert_eq!(totals[&IngredientKey::new("Milk", "cup")], 1);
  }

  #[test]
  fn large_amounts_do_not_overflow() {
    let totals = sum_by_ingredient(&[
      CartLine::new("Rice", "g", "A", i32::MAX),
      CartLine::new("Rice", "g", "B", i32::MAX),
    ]);
    assert_eq!(totals[&IngredientKey::new("Rice", "g")], 2 * i64::from(i32::MAX));
  }
}
