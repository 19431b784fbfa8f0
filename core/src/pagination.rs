// core/src/pagination.rs

//! Page-number pagination shared by the store and the HTTP layer.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  /// 1-based.
  pub page: u32,
  pub limit: u32,
}

impl PageRequest {
  /// Clamps `page` and `limit` to at least 1 and `limit` to at most `max_limit`.
  pub fn new(page: u32, limit: u32, max_limit: u32) -> Self {
    Self {
      page: page.max(1),
      limit: limit.clamp(1, max_limit.max(1)),
    }
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.limit)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub count: u64,
  pub page: u32,
  pub limit: u32,
  pub results: Vec<T>,
}

impl<T> Page<T> {
  pub fn new(request: PageRequest, count: u64, results: Vec<T>) -> Self {
    Self {
      count,
      page: request.page,
      limit: request.limit,
      results,
    }
  }

  /// Paginates an already materialized, already ordered collection.
  pub fn from_items(request: PageRequest, items: Vec<T>) -> Self {
    let count = items.len() as u64;
    let results = items
      .into_iter()
      .skip(request.offset() as usize)
      .take(request.limit as usize)
      .collect();
    Self::new(request, count, results)
  }

  pub fn empty(request: PageRequest) -> Self {
    Self::new(request, 0, Vec::new())
  }

  pub fn has_next(&self) -> bool {
    u64::from(self.page) * u64::from(self.limit) < self.count
  }

  pub fn has_previous(&self) -> bool {
    self.page > 1
  }

  /// Any page but the first is invalid once it starts past the last item.
  pub fn is_out_of_range(&self) -> bool {
    self.page > 1 && u64::from(self.page - 1) * u64::from(self.limit) >= self.count
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      count: self.count,
      page: self.page,
      limit: self.limit,
      results: self.results.into_iter().map(f).collect(),
    }
  }
}
