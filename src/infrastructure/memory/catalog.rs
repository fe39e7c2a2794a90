use std::sync::Mutex;

use crate::domain::category::{Category, CategoryPatch};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product, ProductFilter, ProductPatch};

use super::lock;

#[derive(Default)]
pub struct InMemoryCatalog {
    products: Mutex<Vec<Product>>,
    categories: Mutex<Vec<Category>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryCatalog {
    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let products = lock(&self.products)?;
        Ok(products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let products = lock(&self.products)?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    fn featured(&self, limit: usize) -> Result<Vec<Product>, DomainError> {
        let mut products = lock(&self.products)?.clone();
        // `sort_by` is stable, so equal discounts keep insertion order.
        products.sort_by(|a, b| b.discount.cmp(&a.discount));
        products.truncate(limit);
        Ok(products)
    }

    fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut products = lock(&self.products)?;
        let id = match product.id {
            Some(id) => {
                if products.iter().any(|p| p.id == id) {
                    return Err(DomainError::Conflict(format!(
                        "Product with ID {} already exists",
                        id
                    )));
                }
                id
            }
            None => products.iter().map(|p| p.id).max().unwrap_or(0) + 1,
        };
        let product = product.into_product(id)?;
        products.push(product.clone());
        Ok(product)
    }

    fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, DomainError> {
        let mut products = lock(&self.products)?;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.apply(patch)?;
        Ok(Some(product.clone()))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut products = lock(&self.products)?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

impl CategoryRepository for InMemoryCatalog {
    fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(lock(&self.categories)?.clone())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Category>, DomainError> {
        let categories = lock(&self.categories)?;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let categories = lock(&self.categories)?;
        Ok(categories.iter().any(|c| c.id == id))
    }

    fn insert(&self, category: Category) -> Result<Category, DomainError> {
        let mut categories = lock(&self.categories)?;
        if categories.iter().any(|c| c.id == category.id) {
            return Err(DomainError::Conflict(format!(
                "Category with ID '{}' already exists",
                category.id
            )));
        }
        categories.push(category.clone());
        Ok(category)
    }

    fn update(&self, id: &str, patch: &CategoryPatch) -> Result<Option<Category>, DomainError> {
        let mut categories = lock(&self.categories)?;
        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.apply(patch)?;
        Ok(Some(category.clone()))
    }

    fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut categories = lock(&self.categories)?;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() != before)
    }
}
