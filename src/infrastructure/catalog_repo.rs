use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::category::{Category, CategoryPatch};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::schema::{categories, products};

use super::models::{CategoryRow, ProductRow};

/// Escapes LIKE wildcards so user input is matched literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselCatalogRepository {
    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = products::table
            .select(ProductRow::as_select())
            .order(products::seq.asc())
            .into_boxed();

        if let Some(category) = &filter.category {
            query = query.filter(products::category.eq(category.clone()));
        }
        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            query = query.filter(
                products::name
                    .ilike(pattern.clone())
                    .or(products::description.ilike(pattern.clone()))
                    .or(products::category.ilike(pattern)),
            );
        }

        let rows = query.load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn featured(&self, limit: usize) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .select(ProductRow::as_select())
            .order((products::discount.desc(), products::seq.asc()))
            .limit(limit as i64)
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let id = match product.id {
                Some(id) => id,
                None => {
                    let max: Option<i64> = products::table
                        .select(diesel::dsl::max(products::id))
                        .first(conn)?;
                    max.unwrap_or(0) + 1
                }
            };
            let product = product.into_product(id)?;
            diesel::insert_into(products::table)
                .values(&ProductRow::from(product.clone()))
                .execute(conn)?;
            Ok(product)
        })
    }

    fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = products::table
                .find(id)
                .select(ProductRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Ok(None);
            };

            let mut product = Product::from(row);
            product.apply(patch)?;

            diesel::update(products::table.find(id))
                .set((
                    &ProductRow::from(product.clone()),
                    products::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
            Ok(Some(product))
        })
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

impl CategoryRepository for DieselCatalogRepository {
    fn list(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::seq.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Category::from))
    }

    fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let found = diesel::select(diesel::dsl::exists(categories::table.find(id)))
            .get_result(&mut conn)?;
        Ok(found)
    }

    fn insert(&self, category: Category) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(categories::table)
            .values(&CategoryRow::from(category.clone()))
            .execute(&mut conn)
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => DomainError::Conflict(format!(
                    "Category with ID '{}' already exists",
                    category.id
                )),
                other => other,
            })?;
        Ok(category)
    }

    fn update(&self, id: &str, patch: &CategoryPatch) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = categories::table
                .find(id)
                .select(CategoryRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Ok(None);
            };

            let mut category = Category::from(row);
            category.apply(patch)?;

            diesel::update(categories::table.find(id))
                .set((
                    categories::name.eq(&category.name),
                    categories::icon.eq(&category.icon),
                ))
                .execute(conn)?;
            Ok(Some(category))
        })
    }

    fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(categories::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
