use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::ApiResponse;
use crate::application::SharedCategoryService;
use crate::domain::category::{Category, CategoryPatch, NewCategory};
use crate::errors::{failed, AppError};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            icon: c.icon,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Derived from `name` when absent.
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// The id is fixed once created; only the name and icon can change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    /// Blank keeps the current icon.
    pub icon: Option<String>,
}

impl From<UpdateCategoryRequest> for CategoryPatch {
    fn from(r: UpdateCategoryRequest) -> Self {
        CategoryPatch {
            name: r.name,
            icon: r.icon,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListParams {
    /// Anything but `false` prepends the synthetic `all` category.
    pub include_all: Option<String>,
}

impl CategoryListParams {
    fn include_all(&self) -> bool {
        self.include_all.as_deref() != Some("false")
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    params(CategoryListParams),
    responses(
        (status = 200, description = "All categories", body = [CategoryResponse]),
        (status = 500, description = "Failed to fetch categories"),
    ),
    tag = "categories"
)]
pub async fn get_categories(
    service: web::Data<SharedCategoryService>,
    query: web::Query<CategoryListParams>,
) -> Result<HttpResponse, AppError> {
    let include_all = query.include_all();
    let categories = web::block(move || service.get_all_categories(include_all))
        .await?
        .map_err(failed("Failed to fetch categories"))?;

    let categories: Vec<CategoryResponse> =
        categories.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::list(categories)))
}

/// GET /api/categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Failed to fetch category"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    service: web::Data<SharedCategoryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = web::block(move || service.get_category_by_id(&id))
        .await?
        .map_err(failed("Failed to fetch category"))?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(CategoryResponse::from(category))))
}

/// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Missing name, reserved or duplicate id"),
        (status = 500, description = "Failed to create category"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    service: web::Data<SharedCategoryService>,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let CreateCategoryRequest { id, name, icon } = body.into_inner();
    let category = web::block(move || service.create_category(NewCategory { id, name, icon }))
        .await?
        .map_err(failed("Failed to create category"))?;

    Ok(HttpResponse::Created().json(
        ApiResponse::data(CategoryResponse::from(category))
            .with_message("Category created successfully"),
    ))
}

/// PATCH /api/categories/{id}
#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Blank or oversized name, or the `all` category"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Failed to update category"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    service: web::Data<SharedCategoryService>,
    path: web::Path<String>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = CategoryPatch::from(body.into_inner());
    let category = web::block(move || service.update_category(&id, patch))
        .await?
        .map_err(failed("Failed to update category"))?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::data(CategoryResponse::from(category))
            .with_message("Category updated successfully"),
    ))
}

/// DELETE /api/categories/{id}
///
/// Products keep their category string when the category goes away.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "The `all` category cannot be deleted"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Failed to delete category"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    service: web::Data<SharedCategoryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let deleted = web::block(move || service.delete_category(&id))
        .await?
        .map_err(failed("Failed to delete category"))?;
    if !deleted {
        return Err(AppError::not_found("Category not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()> {
        success: true,
        data: None,
        count: None,
        message: Some("Category deleted successfully"),
    }))
}
