// core/src/render/layout.rs

use crate::shopping::ShoppingPlan;
use chrono::NaiveDate;
use serde::Serialize;

pub const TITLE_FONT_SIZE: u8 = 16;
pub const TITLE_X: i32 = 150;
pub const TITLE_TOP: i32 = 800;
pub const TITLE_PITCH: i32 = 30;

pub const BODY_FONT_SIZE: u8 = 12;
pub const BODY_TOP: i32 = 700;
pub const INGREDIENT_X: i32 = 75;
pub const INGREDIENT_PITCH: i32 = 20;
pub const RECIPE_X: i32 = 150;
pub const RECIPE_PITCH: i32 = 30;

pub const THANK_YOU_LINE: &str = "Thank you for shopping with us!";
pub const USER_LINE_PREFIX: &str = "User: ";
pub const DATE_LINE_PREFIX: &str = "Shopping list. Date: ";
pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const RECIPE_LINE_PREFIX: &str = "Recipe: ";

/// Continuation pages start here.
pub const PAGE_TOP: i32 = 800;
/// No line is drawn below this y.
pub const BOTTOM_MARGIN: i32 = 40;

/// The title block inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListHeader {
  pub full_name: String,
  pub date: NaiveDate,
}

impl ListHeader {
  pub fn lines(&self) -> [String; 3] {
    [
      THANK_YOU_LINE.to_string(),
      format!("{}{}", USER_LINE_PREFIX, self.full_name),
      format!("{}{}", DATE_LINE_PREFIX, self.date.format(DATE_FORMAT)),
    ]
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedLine {
  pub x: i32,
  pub y: i32,
  pub font_size: u8,
  pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLayout {
  pub lines: Vec<PlacedLine>,
}

struct Cursor {
  pages: Vec<PageLayout>,
  y: i32,
}

impl Cursor {
  fn place(&mut self, x: i32, font_size: u8, text: String, pitch: i32) {
    if self.y < BOTTOM_MARGIN {
      self.pages.push(PageLayout::default());
      self.y = PAGE_TOP;
    }
    let y = self.y;
    if let Some(page) = self.pages.last_mut() {
      page.lines.push(PlacedLine { x, y, font_size, text });
    }
    self.y -= pitch;
  }
}

/// Positions every line of the document. The first page always carries the
/// title block, so an empty plan yields exactly one page.
pub fn layout(header: &ListHeader, plan: &ShoppingPlan) -> Vec<PageLayout> {
  let mut cursor = Cursor {
    pages: vec![PageLayout::default()],
    y: TITLE_TOP,
  };
  for text in header.lines() {
    cursor.place(TITLE_X, TITLE_FONT_SIZE, text, TITLE_PITCH);
  }

  cursor.y = BODY_TOP;
  for block in &plan.blocks {
    let ingredient = format!(
      "--{} - {} {}",
      block.ingredient.name, block.total, block.ingredient.measurement_unit
    );
    cursor.place(INGREDIENT_X, BODY_FONT_SIZE, ingredient, INGREDIENT_PITCH);
    for recipe in &block.recipes {
      cursor.place(RECIPE_X, BODY_FONT_SIZE, format!("{RECIPE_LINE_PREFIX}{recipe}"), RECIPE_PITCH);
    }
  }
  cursor.pages
}
