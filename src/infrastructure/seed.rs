//! Starter catalog compiled into the binary.

use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ProductRepository};
use crate::domain::product::{NewProduct, ProductFilter};

const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Deserialize)]
struct SeedCatalog {
    categories: Vec<SeedCategory>,
    products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
struct SeedCategory {
    id: String,
    name: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedProduct {
    id: i64,
    name: String,
    category: String,
    price: BigDecimal,
    original_price: BigDecimal,
    image: String,
    description: String,
    unit: String,
    #[serde(default)]
    in_stock: Option<bool>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
}

fn parse_catalog() -> Result<SeedCatalog, DomainError> {
    serde_json::from_str(CATALOG_JSON)
        .map_err(|e| DomainError::Internal(format!("bundled catalog is invalid: {}", e)))
}

/// Loads the bundled catalog into an empty store. A store that already holds
/// any category or product is left untouched.
pub fn seed_if_empty<P, C>(products: &P, categories: &C) -> Result<SeedReport, DomainError>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    if !categories.list()?.is_empty() || !products.list(&ProductFilter::default())?.is_empty() {
        log::info!("Catalog already populated, skipping seed");
        return Ok(SeedReport::default());
    }

    let catalog = parse_catalog()?;
    let mut report = SeedReport::default();

    for c in catalog.categories {
        categories.insert(Category {
            id: c.id,
            name: c.name,
            icon: c.icon,
        })?;
        report.categories += 1;
    }
    for p in catalog.products {
        products.insert(NewProduct {
            id: Some(p.id),
            name: p.name,
            category: p.category,
            price: p.price,
            original_price: Some(p.original_price),
            image: Some(p.image),
            description: Some(p.description),
            unit: Some(p.unit),
            in_stock: p.in_stock,
        })?;
        report.products += 1;
    }

    log::info!(
        "Seeded {} categories and {} products",
        report.categories,
        report.products
    );
    Ok(report)
}
