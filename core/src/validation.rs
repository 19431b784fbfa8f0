// core/src/validation.rs

//! Field-by-field checks of a `RecipeDraft`.
//!
//! `validate_draft` checks the payload's own shape; `check_references` asks the
//! store whether the referenced ingredients and tags exist. Both collect every
//! failing field instead of stopping at the first one.

use crate::error::{CoreError, CoreResult};
use crate::model::RecipeDraft;
use crate::store::CatalogStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, instrument};

pub const RECIPE_NAME_MAX_LEN: usize = 200;

/// Error messages keyed by payload field, serialized as `{"field": ["msg", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn into_result(self) -> CoreResult<()> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(CoreError::Validation(self))
    }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      if !first {
        f.write_str("; ")?;
      }
      first = false;
      write!(f, "{}: {}", field, messages.join(", "))?;
    }
    Ok(())
  }
}

#[instrument(name = "validation::validate_draft", skip_all, fields(recipe_name = %draft.name))]
pub fn validate_draft(draft: &RecipeDraft) -> CoreResult<()> {
  let mut errors = FieldErrors::new();

  let name = draft.name.trim();
  if name.is_empty() {
    errors.add("name", "Recipe name is required.");
  } else if name.chars().count() > RECIPE_NAME_MAX_LEN {
    errors.add("name", format!("Recipe name must be at most {} characters.", RECIPE_NAME_MAX_LEN));
  }
  if draft.text.trim().is_empty() {
    errors.add("text", "Recipe text is required.");
  }
  if draft.image.trim().is_empty() {
    errors.add("image", "Recipe image is required.");
  }
  if draft.cooking_time < 1 {
    errors.add("cooking_time", "Cooking time must be greater than zero.");
  }

  if draft.ingredients.is_empty() {
    errors.add("ingredients", "Add at least one ingredient.");
  }
  let mut seen_ingredients = HashSet::new();
  for line in &draft.ingredients {
    if !seen_ingredients.insert(line.id) {
      errors.add("ingredients", format!("Ingredient {} is listed more than once.", line.id));
    }
    if line.amount < 1 {
      errors.add("amount", format!("Amount of ingredient {} must be greater than zero.", line.id));
    }
  }

  if draft.tags.is_empty() {
    errors.add("tags", "Choose at least one tag.");
  }
  let mut seen_tags = HashSet::new();
  for tag_id in &draft.tags {
    if !seen_tags.insert(*tag_id) {
      errors.add("tags", format!("Tag {} is listed more than once.", tag_id));
    }
  }

  if !errors.is_empty() {
    debug!(%errors, "Recipe draft rejected.");
  }
  errors.into_result()
}

/// Rejects drafts that reference ingredients or tags the store does not know.
#[instrument(name = "validation::check_references", skip_all)]
pub async fn check_references<S>(store: &S, draft: &RecipeDraft) -> CoreResult<()>
where
  S: CatalogStore + ?Sized,
{
  let mut errors = FieldErrors::new();
  for line in &draft.ingredients {
    if store.get_ingredient(line.id).await?.is_none() {
      errors.add("ingredients", format!("Invalid ingredient id {}: object does not exist.", line.id));
    }
  }
  for tag_id in &draft.tags {
    if store.get_tag(*tag_id).await?.is_none() {
      errors.add("tags", format!("Invalid tag id {}: object does not exist.", tag_id));
    }
  }
  errors.into_result()
}
