pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{CategoryService, OrderService, ProductService};
use handlers::{categories, health, orders, products};
use infrastructure::storage::StorageError;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use infrastructure::Stores;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::Migrate(e.to_string()))?;
    if !applied.is_empty() {
        log::info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Grocery Store API", description = "Catalog, checkout and order lifecycle"),
    paths(
        health::health,
        products::get_products,
        products::get_featured_products,
        products::search_products,
        products::get_products_by_category,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::get_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orders::create_order,
        orders::get_orders,
        orders::get_order,
        orders::update_order_status,
        orders::cancel_order,
    ),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "categories"),
        (name = "orders"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server. Unsupported verbs on a known route answer 405; unknown routes 404.
pub fn build_server(
    stores: Stores,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let product_service = web::Data::new(ProductService::new(stores.products.clone()));
    let category_service = web::Data::new(CategoryService::new(stores.categories.clone()));
    let order_service = web::Data::new(OrderService::new(stores.orders.clone()));
    let status = web::Data::new(stores.status.clone());
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(handlers::json_config())
            .app_data(product_service.clone())
            .app_data(category_service.clone())
            .app_data(order_service.clone())
            .app_data(status.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/health")
                            .route(web::get().to(health::health))
                            .default_service(web::to(handlers::method_not_allowed)),
                    )
                    .service(
                        web::scope("/products")
                            .service(
                                web::resource("")
                                    .route(web::get().to(products::get_products))
                                    .route(web::post().to(products::create_product))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/featured")
                                    .route(web::get().to(products::get_featured_products))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/search")
                                    .route(web::get().to(products::search_products))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/category/{category}")
                                    .route(web::get().to(products::get_products_by_category))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(products::get_product))
                                    .route(web::patch().to(products::update_product))
                                    .route(web::delete().to(products::delete_product))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            ),
                    )
                    .service(
                        web::scope("/categories")
                            .service(
                                web::resource("")
                                    .route(web::get().to(categories::get_categories))
                                    .route(web::post().to(categories::create_category))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(categories::get_category))
                                    .route(web::patch().to(categories::update_category))
                                    .route(web::delete().to(categories::delete_category))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            ),
                    )
                    .service(
                        web::scope("/orders")
                            .service(
                                web::resource("")
                                    .route(web::get().to(orders::get_orders))
                                    .route(web::post().to(orders::create_order))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/{order_id}")
                                    .route(web::get().to(orders::get_order))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/{order_id}/status")
                                    .route(web::patch().to(orders::update_order_status))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            )
                            .service(
                                web::resource("/{order_id}/cancel")
                                    .route(web::patch().to(orders::cancel_order))
                                    .default_service(web::to(handlers::method_not_allowed)),
                            ),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .default_service(web::to(handlers::route_not_found))
    })
    .bind((host.to_string(), port))?
    .run())
}
