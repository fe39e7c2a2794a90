use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderAddress, OrderItem};
use crate::domain::product::Product;
use crate::schema::{categories, order_items, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
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

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(primary_key(order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub order_id: String,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub address_name: String,
    pub address_phone: String,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_pin: String,
    pub payment_method: String,
    pub subtotal: BigDecimal,
    pub savings: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Insertable)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: String,
    pub position: i32,
    pub product_id: i64,
    pub name: String,
    pub price: BigDecimal,
    pub original_price: BigDecimal,
    pub quantity: i32,
    pub image: String,
    pub unit: String,
}

// ── Row <-> domain ───────────────────────────────────────────────────────────

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            icon: row.icon,
        }
    }
}

impl From<Category> for CategoryRow {
    fn from(category: Category) -> Self {
        CategoryRow {
            id: category.id,
            name: category.name,
            icon: category.icon,
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            original_price: row.original_price,
            discount: row.discount,
            image: row.image,
            description: row.description,
            unit: row.unit,
            in_stock: row.in_stock,
        }
    }
}

impl From<Product> for ProductRow {
    fn from(product: Product) -> Self {
        ProductRow {
            id: product.id,
            name: product.name,
            category: product.category,
            price: product.price,
            original_price: product.original_price,
            discount: product.discount,
            image: product.image,
            description: product.description,
            unit: product.unit,
            in_stock: product.in_stock,
        }
    }
}

fn corrupt_row(e: DomainError) -> DomainError {
    DomainError::Internal(format!("corrupt order row: {}", e))
}

impl OrderRow {
    pub fn from_order(order: &Order) -> Self {
        OrderRow {
            order_id: order.order_id.clone(),
            user_id: order.user_id.clone(),
            username: order.username.clone(),
            address_name: order.address.name.clone(),
            address_phone: order.address.phone.clone(),
            address_street: order.address.street.clone(),
            address_city: order.address.city.clone(),
            address_state: order.address.state.clone(),
            address_pin: order.address.pin.clone(),
            payment_method: order.payment_method.as_str().to_string(),
            subtotal: order.subtotal.clone(),
            savings: order.savings.clone(),
            total: order.total.clone(),
            status: order.status.as_str().to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    /// Rebuilds the domain order. Items must already be in position order.
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
        Ok(Order {
            payment_method: self.payment_method.parse().map_err(corrupt_row)?,
            status: self.status.parse().map_err(corrupt_row)?,
            order_id: self.order_id,
            user_id: self.user_id,
            username: self.username,
            items: items
                .into_iter()
                .map(|i| OrderItem {
                    product_id: i.product_id,
                    name: i.name,
                    price: i.price,
                    original_price: i.original_price,
                    quantity: i.quantity,
                    image: i.image,
                    unit: i.unit,
                })
                .collect(),
            address: OrderAddress {
                name: self.address_name,
                phone: self.address_phone,
                street: self.address_street,
                city: self.address_city,
                state: self.address_state,
                pin: self.address_pin,
            },
            subtotal: self.subtotal,
            savings: self.savings,
            total: self.total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl OrderItemRow {
    pub fn from_item(order_id: &str, position: usize, item: &OrderItem) -> Self {
        OrderItemRow {
            id: Uuid::new_v4(),
            order_id: order_id.to_string(),
            position: position as i32,
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price.clone(),
            original_price: item.original_price.clone(),
            quantity: item.quantity,
            image: item.image.clone(),
            unit: item.unit.clone(),
        }
    }
}
