// core/src/shopping/mod.rs

//! Shopping-list assembly: sum the cart per ingredient, then regroup the raw
//! lines under the recipes that contributed them.

mod aggregate;
mod plan;

pub use aggregate::{collect_cart_lines, sum_by_ingredient, IngredientTotals};
pub use plan::{build_plan, IngredientBlock, ShoppingPlan};
