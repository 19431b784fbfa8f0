// server/src/web/pagination.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use actix_web::{HttpRequest, HttpResponse};
use foodgram::{Page, PageRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

impl PageParams {
  pub fn request(&self, config: &AppConfig) -> PageRequest {
    PageRequest::new(
      self.page.unwrap_or(1),
      self.limit.unwrap_or(config.page_size),
      config.max_page_size,
    )
  }
}

#[derive(Debug, Serialize)]
pub struct PaginatedBody<T> {
  pub count: u64,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

/// `req`'s absolute URL with `page` replaced. Other parameters keep their raw encoding.
fn page_link(req: &HttpRequest, config: &AppConfig, page: u32) -> String {
  let mut pairs: Vec<String> = req
    .query_string()
    .split('&')
    .filter(|pair| !pair.is_empty() && *pair != "page" && !pair.starts_with("page="))
    .map(str::to_string)
    .collect();
  if page > 1 {
    pairs.push(format!("page={}", page));
  }
  let base = format!("{}{}", config.app_base_url, req.path());
  if pairs.is_empty() {
    base
  } else {
    format!("{}?{}", base, pairs.join("&"))
  }
}

pub fn paginated_body<T>(req: &HttpRequest, config: &AppConfig, page: Page<T>) -> Result<PaginatedBody<T>, AppError> {
  if page.is_out_of_range() {
    return Err(AppError::NotFound("Invalid page.".to_string()));
  }
  Ok(PaginatedBody {
    count: page.count,
    next: page.has_next().then(|| page_link(req, config, page.page + 1)),
    previous: page.has_previous().then(|| page_link(req, config, page.page - 1)),
    results: page.results,
  })
}

pub fn paginated_response<T: Serialize>(
  req: &HttpRequest,
  config: &AppConfig,
  page: Page<T>,
) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(paginated_body(req, config, page)?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LogFormat;
  use actix_web::test::TestRequest;

  fn config() -> AppConfig {
    AppConfig {
      server_host: "127.0.0.1".into(),
      server_port: 8080,
      database_url: String::new(),
      database_max_connections: 1,
      app_base_url: "http://foodgram.test".into(),
      page_size: 2,
      max_page_size: 10,
      log_format: LogFormat::Pretty,
    }
  }

  #[test]
  fn links_keep_other_parameters() {
    let req = TestRequest::get()
      .uri("/api/recipes?tags=lunch&page=2&tags=dinner&limit=2")
      .to_http_request();
    let page = Page::new(PageRequest::new(2, 2, 10), 7, vec![1, 2]);

    let body = paginated_body(&req, &config(), page).unwrap();
    assert_eq!(
      body.next.as_deref(),
      Some("http://foodgram.test/api/recipes?tags=lunch&tags=dinner&limit=2&page=3")
    );
    assert_eq!(
      body.previous.as_deref(),
      Some("http://foodgram.test/api/recipes?tags=lunch&tags=dinner&limit=2")
    );
  }

  #[test]
  fn last_page_has_no_next() {
    let req = TestRequest::get().uri("/api/users?page=2").to_http_request();
    let body = paginated_body(&req, &config(), Page::new(PageRequest::new(2, 2, 10), 4, vec![3, 4])).unwrap();
    assert!(body.next.is_none());
    assert_eq!(body.previous.as_deref(), Some("http://foodgram.test/api/users"));
  }

  #[test]
  fn page_past_the_end_is_not_found() {
    let req = TestRequest::get().uri("/api/users?page=9").to_http_request();
    let page: Page<i32> = Page::new(PageRequest::new(9, 2, 10), 4, vec![]);
    assert!(matches!(paginated_body(&req, &config(), page), Err(AppError::NotFound(_))));
  }

  #[test]
  fn defaults_come_from_config() {
    let request = PageParams::default().request(&config());
    assert_eq!(request, PageRequest::new(1, 2, 10));
    let capped = PageParams {
      page: Some(3),
      limit: Some(500),
    }
    .request(&config());
    assert_eq!(capped.limit, 10);
  }
}
