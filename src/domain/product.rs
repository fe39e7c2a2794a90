use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;
use super::limits::{self, check_length, MAX_ID_LEN, MAX_NAME_LEN, MAX_UNIT_LEN};

pub const DEFAULT_UNIT: &str = "pcs";

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub original_price: BigDecimal,
    pub discount: BigDecimal,
    pub image: String,
    pub description: String,
    pub unit: String,
    pub in_stock: bool,
}

/// Fields accepted when creating a product. Missing optional fields get the
/// catalog defaults in [`NewProduct::into_product`].
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub in_stock: Option<bool>,
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<BigDecimal>,
    pub original_price: Option<BigDecimal>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub in_stock: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Computes the discount for a selling price and an MRP.
///
/// Rejects negative prices and a selling price above the MRP, so the stored
/// discount is always `original_price - price` and never negative.
pub fn discount_for(price: &BigDecimal, original_price: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if *price < BigDecimal::zero() || *original_price < BigDecimal::zero() {
        return Err(DomainError::invalid("Prices cannot be negative"));
    }
    if price > original_price {
        return Err(DomainError::invalid(
            "Selling price cannot be greater than MRP",
        ));
    }
    Ok(original_price - price)
}

fn require_text(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(format!("Product {} is required", field)));
    }
    Ok(())
}

fn check_text_fields(
    name: Option<&str>,
    category: Option<&str>,
    unit: Option<&str>,
) -> Result<(), DomainError> {
    if let Some(name) = name {
        require_text(name, "name")?;
        check_length(name.trim(), MAX_NAME_LEN, "Product name")?;
    }
    if let Some(category) = category {
        require_text(category, "category")?;
        check_length(category, MAX_ID_LEN, "Product category")?;
    }
    if let Some(unit) = unit {
        check_length(unit, MAX_UNIT_LEN, "Product unit")?;
    }
    Ok(())
}

/// Cent-rounded `(price, original_price, discount)`.
fn priced(
    price: &BigDecimal,
    original_price: &BigDecimal,
) -> Result<(BigDecimal, BigDecimal, BigDecimal), DomainError> {
    let price = limits::money(price, "price")?;
    let original_price = limits::money(original_price, "originalPrice")?;
    let discount = discount_for(&price, &original_price)?;
    Ok((price, original_price, discount))
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text_fields(
            Some(&self.name),
            Some(&self.category),
            self.unit.as_deref(),
        )?;
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(DomainError::invalid("Product ID must be a positive integer"));
            }
        }
        priced(&self.price, self.original_price.as_ref().unwrap_or(&self.price))?;
        Ok(())
    }

    /// Validates and builds the stored product under `id`. Prices are
    /// rounded to cents before the discount is derived.
    pub fn into_product(self, id: i64) -> Result<Product, DomainError> {
        self.validate()?;
        let (price, original_price, discount) =
            priced(&self.price, self.original_price.as_ref().unwrap_or(&self.price))?;
        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            price,
            original_price,
            discount,
            image: self.image.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            unit: self.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            in_stock: self.in_stock.unwrap_or(true),
        })
    }
}

impl ProductPatch {
    /// Checks that do not depend on the stored product.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text_fields(
            self.name.as_deref(),
            self.category.as_deref(),
            self.unit.as_deref(),
        )?;
        let zero = BigDecimal::zero();
        if self.price.as_ref().is_some_and(|p| *p < zero)
            || self.original_price.as_ref().is_some_and(|p| *p < zero)
        {
            return Err(DomainError::invalid("Prices cannot be negative"));
        }
        if let Some(price) = &self.price {
            limits::money(price, "price")?;
        }
        if let Some(original_price) = &self.original_price {
            limits::money(original_price, "originalPrice")?;
        }
        Ok(())
    }
}

impl Product {
    /// Merges `patch` into this product and recomputes the discount from the
    /// merged prices. On error the product is left unchanged.
    pub fn apply(&mut self, patch: &ProductPatch) -> Result<(), DomainError> {
        patch.validate()?;
        let (price, original_price, discount) = priced(
            patch.price.as_ref().unwrap_or(&self.price),
            patch.original_price.as_ref().unwrap_or(&self.original_price),
        )?;

        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(unit) = &patch.unit {
            self.unit = unit.clone();
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
        self.price = price;
        self.original_price = original_price;
        self.discount = discount;
        Ok(())
    }
}

impl ProductFilter {
    /// `"all"` and blank values mean "no filter".
    pub fn new(category: Option<String>, search: Option<String>) -> Self {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != super::category::ALL_CATEGORY_ID);
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { category, search }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category != *category {
                return false;
            }
        }
        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                [&product.name, &product.description, &product.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn rice() -> Product {
        NewProduct {
            name: "Basmati Rice".to_string(),
            category: "grains".to_string(),
            price: dec("90"),
            original_price: Some(dec("100")),
            description: Some("Long grain aromatic rice".to_string()),
            unit: Some("1kg".to_string()),
            ..Default::default()
        }
        .into_product(1)
        .expect("valid product")
    }

    #[test]
    fn new_product_computes_discount_and_defaults() {
        let product = NewProduct {
            name: "Salt".to_string(),
            category: "spices".to_string(),
            price: dec("20"),
            ..Default::default()
        }
        .into_product(7)
        .expect("valid product");

        assert_eq!(product.original_price, dec("20"));
        assert_eq!(product.discount, dec("0"));
        assert_eq!(product.unit, DEFAULT_UNIT);
        assert!(product.in_stock);
        assert_eq!(product.image, "");
        assert_eq!(product.description, "");
    }

    #[test]
    fn new_product_requires_name() {
        let draft = NewProduct {
            name: "  ".to_string(),
            category: "grains".to_string(),
            price: dec("1"),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn apply_recomputes_discount_when_one_price_changes() {
        let mut product = rice();
        product
            .apply(&ProductPatch {
                price: Some(dec("75")),
                ..Default::default()
            })
            .expect("valid patch");

        assert_eq!(product.price, dec("75"));
        assert_eq!(product.discount, dec("25"));
    }

    #[test]
    fn apply_rejects_selling_price_above_mrp_and_keeps_product() {
        let mut product = rice();
        let before = product.clone();

        let err = product
            .apply(&ProductPatch {
                price: Some(dec("120")),
                in_stock: Some(false),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid input: Selling price cannot be greater than MRP"
        );
        assert_eq!(product, before);
    }

    #[test]
    fn apply_merges_non_price_fields() {
        let mut product = rice();
        product
            .apply(&ProductPatch {
                in_stock: Some(false),
                image: Some("https://img.example/rice.png".to_string()),
                ..Default::default()
            })
            .expect("valid patch");

        assert!(!product.in_stock);
        assert_eq!(product.image, "https://img.example/rice.png");
        assert_eq!(product.name, "Basmati Rice");
        assert_eq!(product.discount, dec("10"));
    }

    #[test]
    fn filter_treats_all_as_no_category() {
        let filter = ProductFilter::new(Some("all".to_string()), Some("  ".to_string()));
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn filter_search_is_case_insensitive_over_name_description_category() {
        let product = rice();
        for needle in ["RICE", "rice", "aromatic", "GRAIN"] {
            let filter = ProductFilter::new(None, Some(needle.to_string()));
            assert!(filter.matches(&product), "expected match for {}", needle);
        }
        let filter = ProductFilter::new(None, Some("sugar".to_string()));
        assert!(!filter.matches(&product));
    }

    #[test]
    fn filter_category_and_search_compose() {
        let product = rice();
        let filter = ProductFilter::new(Some("spices".to_string()), Some("rice".to_string()));
        assert!(!filter.matches(&product));
    }

    #[test]
    fn sub_cent_prices_are_rounded_before_the_discount() {
        let product = NewProduct {
            name: "Toffee".to_string(),
            category: "snacks".to_string(),
            price: dec("0.005"),
            original_price: Some(dec("0.014")),
            ..Default::default()
        }
        .into_product(3)
        .expect("valid product");

        assert_eq!(product.price, dec("0.01"));
        assert_eq!(product.original_price, dec("0.01"));
        assert_eq!(product.discount, &product.original_price - &product.price);
    }

    #[test]
    fn prices_beyond_the_money_range_are_rejected() {
        let draft = NewProduct {
            name: "Gold".to_string(),
            category: "luxury".to_string(),
            price: dec("10000000000"),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(DomainError::InvalidInput(_))));

        let mut product = rice();
        let before = product.clone();
        let result = product.apply(&ProductPatch {
            original_price: Some(dec("10000000000")),
            ..Default::default()
        });
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(product, before);
    }

    #[test]
    fn text_fields_are_length_checked() {
        let long_name = NewProduct {
            name: "r".repeat(256),
            category: "grains".to_string(),
            price: dec("1"),
            ..Default::default()
        };
        assert_eq!(
            long_name.validate().unwrap_err().to_string(),
            "Invalid input: Product name must be at most 255 characters"
        );

        let patch = ProductPatch {
            unit: Some("u".repeat(33)),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::InvalidInput(_))));

        let patch = ProductPatch {
            category: Some("c".repeat(65)),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::InvalidInput(_))));
    }
}
