pub mod category_service;
pub mod order_service;
pub mod product_service;

use std::sync::Arc;

use crate::domain::ports::{CategoryRepository, OrderRepository, ProductRepository};

pub use category_service::CategoryService;
pub use order_service::OrderService;
pub use product_service::ProductService;

/// Services over whichever backend was chosen at startup.
pub type SharedProductService = ProductService<Arc<dyn ProductRepository>>;
pub type SharedCategoryService = CategoryService<Arc<dyn CategoryRepository>>;
pub type SharedOrderService = OrderService<Arc<dyn OrderRepository>>;
