use std::sync::Arc;

use super::category::{Category, CategoryPatch};
use super::errors::DomainError;
use super::order::{Order, OrderStatus};
use super::product::{NewProduct, Product, ProductFilter, ProductPatch};

pub trait ProductRepository: Send + Sync + 'static {
    /// Products matching `filter`, in insertion order.
    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    /// Highest discount first; equal discounts keep insertion order.
    fn featured(&self, limit: usize) -> Result<Vec<Product>, DomainError>;
    /// Stores a validated product, assigning the next free id when `id` is
    /// `None`. Fails with `Conflict` if the id is taken.
    fn insert(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Applies `patch` atomically. `Ok(None)` when the product does not exist.
    fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

pub trait CategoryRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Category>, DomainError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Category>, DomainError>;
    fn exists(&self, id: &str) -> Result<bool, DomainError>;
    fn insert(&self, category: Category) -> Result<Category, DomainError>;
    /// Applies `patch` atomically. `Ok(None)` when the category does not exist.
    fn update(&self, id: &str, patch: &CategoryPatch) -> Result<Option<Category>, DomainError>;
    fn delete(&self, id: &str) -> Result<bool, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn insert(&self, order: Order) -> Result<Order, DomainError>;
    /// Newest first, optionally restricted to one username.
    fn list(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError>;
    fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, DomainError>;
    /// Checks the transition against the current status and writes it in one
    /// step. `Ok(None)` when the order does not exist.
    fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError>;
}

impl<T: ProductRepository + ?Sized> ProductRepository for Arc<T> {
    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        (**self).list(filter)
    }
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        (**self).find_by_id(id)
    }
    fn featured(&self, limit: usize) -> Result<Vec<Product>, DomainError> {
        (**self).featured(limit)
    }
    fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        (**self).insert(product)
    }
    fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, DomainError> {
        (**self).update(id, patch)
    }
    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        (**self).delete(id)
    }
}

impl<T: CategoryRepository + ?Sized> CategoryRepository for Arc<T> {
    fn list(&self) -> Result<Vec<Category>, DomainError> {
        (**self).list()
    }
    fn find_by_id(&self, id: &str) -> Result<Option<Category>, DomainError> {
        (**self).find_by_id(id)
    }
    fn exists(&self, id: &str) -> Result<bool, DomainError> {
        (**self).exists(id)
    }
    fn insert(&self, category: Category) -> Result<Category, DomainError> {
        (**self).insert(category)
    }
    fn update(&self, id: &str, patch: &CategoryPatch) -> Result<Option<Category>, DomainError> {
        (**self).update(id, patch)
    }
    fn delete(&self, id: &str) -> Result<bool, DomainError> {
        (**self).delete(id)
    }
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn insert(&self, order: Order) -> Result<Order, DomainError> {
        (**self).insert(order)
    }
    fn list(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError> {
        (**self).list(username)
    }
    fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(order_id)
    }
    fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        (**self).update_status(order_id, status)
    }
}
