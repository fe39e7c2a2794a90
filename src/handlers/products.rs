use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{decimal, money, ApiResponse};
use crate::application::product_service::DEFAULT_FEATURED_LIMIT;
use crate::application::SharedProductService;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::errors::{failed, AppError};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub original_price: f64,
    pub discount: f64,
    pub image: String,
    pub description: String,
    pub unit: String,
    pub in_stock: bool,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            price: money(&p.price),
            original_price: money(&p.original_price),
            discount: money(&p.discount),
            name: p.name,
            category: p.category,
            image: p.image,
            description: p.description,
            unit: p.unit,
            in_stock: p.in_stock,
        }
    }
}

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

/// Any `discount` sent by the client is ignored; it is derived from the prices.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    /// Defaults to `price`.
    pub original_price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Defaults to `"pcs"`.
    pub unit: Option<String>,
    /// Defaults to `true`.
    pub in_stock: Option<bool>,
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, AppError> {
        let price = self
            .price
            .ok_or_else(|| AppError::validation("Product price is required"))?;
        Ok(NewProduct {
            id: self.id,
            name: self.name.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price: decimal(price, "price")?,
            original_price: self
                .original_price
                .map(|p| decimal(p, "originalPrice"))
                .transpose()?,
            image: self.image,
            description: self.description,
            unit: self.unit,
            in_stock: self.in_stock,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub in_stock: Option<bool>,
}

impl UpdateProductRequest {
    fn into_patch(self) -> Result<ProductPatch, AppError> {
        Ok(ProductPatch {
            name: self.name,
            category: self.category,
            price: self.price.map(|p| decimal(p, "price")).transpose()?,
            original_price: self
                .original_price
                .map(|p| decimal(p, "originalPrice"))
                .transpose()?,
            image: self.image,
            description: self.description,
            unit: self.unit,
            in_stock: self.in_stock,
        })
    }
}

// ── Query parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Category id; `all` means every category.
    pub category: Option<String>,
    /// Case-insensitive match on name, description or category.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedParams {
    /// Number of products to return (default 10, clamped to 1..=100).
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation("Invalid product ID"))
}

fn parse_limit(raw: Option<&str>) -> Result<usize, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_FEATURED_LIMIT),
        Some(raw) => raw
            .parse::<i64>()
            .map(|n| n.max(0) as usize)
            .map_err(|_| AppError::validation("Invalid limit")),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListParams),
    responses(
        (status = 200, description = "Products matching the filters", body = [ProductResponse]),
        (status = 500, description = "Failed to fetch products"),
    ),
    tag = "products"
)]
pub async fn get_products(
    service: web::Data<SharedProductService>,
    query: web::Query<ProductListParams>,
) -> Result<HttpResponse, AppError> {
    let ProductListParams { category, search } = query.into_inner();
    let products = web::block(move || service.get_all_products(category, search))
        .await?
        .map_err(failed("Failed to fetch products"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(to_responses(products))))
}

/// GET /api/products/featured
///
/// Highest-discount products first; equal discounts keep catalog order.
#[utoipa::path(
    get,
    path = "/api/products/featured",
    params(FeaturedParams),
    responses(
        (status = 200, description = "Featured products", body = [ProductResponse]),
        (status = 400, description = "Invalid limit"),
        (status = 500, description = "Failed to fetch featured products"),
    ),
    tag = "products"
)]
pub async fn get_featured_products(
    service: web::Data<SharedProductService>,
    query: web::Query<FeaturedParams>,
) -> Result<HttpResponse, AppError> {
    let limit = parse_limit(query.limit.as_deref())?;
    let products = web::block(move || service.get_featured_products(limit))
        .await?
        .map_err(failed("Failed to fetch featured products"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(to_responses(products))))
}

/// GET /api/products/search
#[utoipa::path(
    get,
    path = "/api/products/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Products matching the query", body = [ProductResponse]),
        (status = 400, description = "Search query is required"),
        (status = 500, description = "Failed to search products"),
    ),
    tag = "products"
)]
pub async fn search_products(
    service: web::Data<SharedProductService>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner().q.unwrap_or_default();
    if q.trim().is_empty() {
        return Err(AppError::validation("Search query is required"));
    }
    let products = web::block(move || service.search_products(&q))
        .await?
        .map_err(failed("Failed to search products"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(to_responses(products))))
}

/// GET /api/products/category/{category}
#[utoipa::path(
    get,
    path = "/api/products/category/{category}",
    params(("category" = String, Path, description = "Category id, or `all`")),
    responses(
        (status = 200, description = "Products in the category", body = [ProductResponse]),
        (status = 500, description = "Failed to fetch products by category"),
    ),
    tag = "products"
)]
pub async fn get_products_by_category(
    service: web::Data<SharedProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let category = path.into_inner();
    let products = web::block(move || service.get_products_by_category(category))
        .await?
        .map_err(failed("Failed to fetch products by category"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(to_responses(products))))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Invalid product ID"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Failed to fetch product"),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<SharedProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let product = web::block(move || service.get_product_by_id(id))
        .await?
        .map_err(failed("Failed to fetch product"))?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(ProductResponse::from(product))))
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Missing field, bad price or duplicate id"),
        (status = 500, description = "Failed to create product"),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<SharedProductService>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let new_product = body.into_inner().into_new_product()?;
    let product = web::block(move || service.create_product(new_product))
        .await?
        .map_err(failed("Failed to create product"))?;

    Ok(HttpResponse::Created().json(
        ApiResponse::data(ProductResponse::from(product))
            .with_message("Product created successfully"),
    ))
}

/// PATCH /api/products/{id}
///
/// Partial update. The discount is recomputed from the merged prices and a
/// selling price above the MRP is rejected.
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid product ID or price"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Failed to update product"),
    ),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<SharedProductService>,
    path: web::Path<String>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let patch = body.into_inner().into_patch()?;
    let product = web::block(move || service.update_product(id, patch))
        .await?
        .map_err(failed("Failed to update product"))?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::data(ProductResponse::from(product))
            .with_message("Product updated successfully"),
    ))
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, description = "Invalid product ID"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Failed to delete product"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    service: web::Data<SharedProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let deleted = web::block(move || service.delete_product(id))
        .await?
        .map_err(failed("Failed to delete product"))?;
    if !deleted {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()> {
        success: true,
        data: None,
        count: None,
        message: Some("Product deleted successfully"),
    }))
}
