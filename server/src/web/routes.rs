// server/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{catalog_handlers, recipe_handlers, relation_handlers, user_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::JsonConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
      web::QueryConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/tags")
          .route("", web::get().to(catalog_handlers::list_tags))
          .route("/{tag_id}", web::get().to(catalog_handlers::get_tag)),
      )
      .service(
        web::scope("/ingredients")
          .route("", web::get().to(catalog_handlers::list_ingredients))
          .route("/{ingredient_id}", web::get().to(catalog_handlers::get_ingredient)),
      )
      .service(
        web::scope("/recipes")
          .route("", web::get().to(recipe_handlers::list_recipes))
          .route("", web::post().to(recipe_handlers::create_recipe))
          // Must precede "/{recipe_id}".
          .route(
            "/download_shopping_cart",
            web::get().to(relation_handlers::download_shopping_cart),
          )
          .route("/{recipe_id}", web::get().to(recipe_handlers::get_recipe))
          .route("/{recipe_id}", web::patch().to(recipe_handlers::update_recipe))
          .route("/{recipe_id}", web::put().to(recipe_handlers::update_recipe))
          .route("/{recipe_id}", web::delete().to(recipe_handlers::delete_recipe))
          .route("/{recipe_id}/favorite", web::post().to(relation_handlers::add_favorite))
          .route("/{recipe_id}/favorite", web::delete().to(relation_handlers::remove_favorite))
          .route(
            "/{recipe_id}/shopping_cart",
            web::post().to(relation_handlers::add_to_shopping_cart),
          )
          .route(
            "/{recipe_id}/shopping_cart",
            web::delete().to(relation_handlers::remove_from_shopping_cart),
          ),
      )
      .service(
        web::scope("/users")
          .route("", web::get().to(user_handlers::list_users))
          .route("/me", web::get().to(user_handlers::me))
          .route("/subscriptions", web::get().to(user_handlers::list_subscriptions))
          .route("/{user_id}", web::get().to(user_handlers::get_user))
          .route("/{user_id}/subscribe", web::post().to(user_handlers::subscribe))
          .route("/{user_id}/subscribe", web::delete().to(user_handlers::unsubscribe)),
      ),
  );
}
