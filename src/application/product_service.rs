use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductFilter, ProductPatch};

pub const DEFAULT_FEATURED_LIMIT: usize = 10;
pub const MAX_FEATURED_LIMIT: usize = 100;

pub struct ProductService<R> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// `category == "all"` means no category restriction; `search` matches
    /// name, description or category case-insensitively.
    pub fn get_all_products(
        &self,
        category: Option<String>,
        search: Option<String>,
    ) -> Result<Vec<Product>, DomainError> {
        self.repo.list(&ProductFilter::new(category, search))
    }

    pub fn get_product_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn get_products_by_category(&self, category: String) -> Result<Vec<Product>, DomainError> {
        self.repo.list(&ProductFilter::new(Some(category), None))
    }

    /// At most `MAX_FEATURED_LIMIT` products; a limit of 0 yields none.
    pub fn get_featured_products(&self, limit: usize) -> Result<Vec<Product>, DomainError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.repo.featured(limit.min(MAX_FEATURED_LIMIT))
    }

    pub fn search_products(&self, query: &str) -> Result<Vec<Product>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::invalid("Search query is required"));
        }
        self.repo
            .list(&ProductFilter::new(None, Some(query.to_string())))
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        product.validate()?;
        if let Some(id) = product.id {
            if self.repo.find_by_id(id)?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "Product with ID {} already exists",
                    id
                )));
            }
        }
        let created = self.repo.insert(product)?;
        log::info!("Created product {} ({})", created.id, created.name);
        Ok(created)
    }

    pub fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>, DomainError> {
        patch.validate()?;
        let updated = self.repo.update(id, &patch)?;
        if let Some(product) = &updated {
            log::info!(
                "Updated product {}: price {} / MRP {}, in stock: {}",
                product.id,
                product.price,
                product.original_price,
                product.in_stock
            );
        }
        Ok(updated)
    }

    pub fn delete_product(&self, id: i64) -> Result<bool, DomainError> {
        self.repo.delete(id)
    }
}
