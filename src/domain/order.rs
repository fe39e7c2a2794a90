use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::limits::{self, check_length, MAX_NAME_LEN, MAX_PHONE_LEN, MAX_PIN_LEN, MAX_UNIT_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cod,
    Upi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: i64,
    pub name: String,
    pub price: BigDecimal,
    pub original_price: BigDecimal,
    pub quantity: i32,
    pub image: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAddress {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pin: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub items: Vec<OrderItem>,
    pub address: OrderAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: BigDecimal,
    pub savings: BigDecimal,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Address as submitted at checkout; every field must be present.
#[derive(Debug, Clone, Default)]
pub struct AddressDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin: Option<String>,
}

/// Checkout input before validation.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub address: Option<AddressDraft>,
    /// Raw wire value; parsed once the presence checks have passed.
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: BigDecimal,
    pub savings: BigDecimal,
    pub total: BigDecimal,
}

// ── Enums ────────────────────────────────────────────────────────────────────

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(PaymentMethod::Cod),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(DomainError::invalid(format!(
                "Invalid payment method: {}",
                other
            ))),
        }
    }
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one step from `self`.
    pub fn next_statuses(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Processing, Cancelled],
            Processing => &[Shipped, Cancelled],
            Shipped => &[Delivered],
            Delivered | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::invalid(format!("Invalid status: {}", s)))
    }
}

// ── Checkout ─────────────────────────────────────────────────────────────────

impl OrderTotals {
    pub fn from_items(items: &[OrderItem]) -> Self {
        let mut subtotal = BigDecimal::zero();
        let mut total = BigDecimal::zero();
        for item in items {
            let quantity = BigDecimal::from(item.quantity);
            subtotal += &item.original_price * &quantity;
            total += &item.price * &quantity;
        }
        let savings = &subtotal - &total;
        Self {
            subtotal,
            savings,
            total,
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, DomainError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::invalid(format!("Address is missing {}", field)))
}

impl AddressDraft {
    pub fn validate(self) -> Result<OrderAddress, DomainError> {
        let address = OrderAddress {
            name: required(self.name, "name")?,
            phone: required(self.phone, "phone")?,
            street: required(self.street, "street")?,
            city: required(self.city, "city")?,
            state: required(self.state, "state")?,
            pin: required(self.pin, "pin")?,
        };
        check_length(&address.name, MAX_NAME_LEN, "Address name")?;
        check_length(&address.phone, MAX_PHONE_LEN, "Address phone")?;
        check_length(&address.city, MAX_NAME_LEN, "Address city")?;
        check_length(&address.state, MAX_NAME_LEN, "Address state")?;
        check_length(&address.pin, MAX_PIN_LEN, "Address pin")?;
        Ok(address)
    }
}

fn validate_item(index: usize, item: &OrderItem) -> Result<(), DomainError> {
    if item.name.trim().is_empty() {
        return Err(DomainError::invalid(format!(
            "Item at index {} is missing name",
            index
        )));
    }
    if item.price < BigDecimal::zero() {
        return Err(DomainError::invalid(format!(
            "Item at index {} has invalid price: {}",
            index, item.price
        )));
    }
    if item.original_price < BigDecimal::zero() {
        return Err(DomainError::invalid(format!(
            "Item at index {} has invalid originalPrice: {}",
            index, item.original_price
        )));
    }
    if item.quantity <= 0 {
        return Err(DomainError::invalid(format!(
            "Item at index {} has invalid quantity: {}",
            index, item.quantity
        )));
    }
    check_length(item.name.trim(), MAX_NAME_LEN, &format!("Item at index {} name", index))?;
    check_length(&item.unit, MAX_UNIT_LEN, &format!("Item at index {} unit", index))?;
    Ok(())
}

/// Snapshot with both prices rounded to cents.
fn priced_item(index: usize, item: OrderItem) -> Result<OrderItem, DomainError> {
    let price = limits::money(&item.price, &format!("Item at index {} price", index))?;
    let original_price = limits::money(
        &item.original_price,
        &format!("Item at index {} originalPrice", index),
    )?;
    Ok(OrderItem {
        price,
        original_price,
        ..item
    })
}

impl OrderDraft {
    /// Validates the checkout input and builds a `pending` order stamped with
    /// `now`. Totals are computed from the items; nothing is trusted from the
    /// client beyond the item snapshots.
    pub fn into_order(self, order_id: String, now: DateTime<Utc>) -> Result<Order, DomainError> {
        let items = match self.items {
            Some(items) if !items.is_empty() => items,
            _ => {
                return Err(DomainError::invalid(
                    "Order must contain at least one item",
                ))
            }
        };
        let address = self
            .address
            .ok_or_else(|| DomainError::invalid("Delivery address is required"))?;
        let payment_method = self
            .payment_method
            .map(|method| method.trim().to_string())
            .filter(|method| !method.is_empty())
            .ok_or_else(|| DomainError::invalid("Payment method is required"))?
            .parse::<PaymentMethod>()?;

        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;
        }
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| priced_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;
        let address = address.validate()?;
        for (value, field) in [(&self.user_id, "User ID"), (&self.username, "Username")] {
            if let Some(value) = value {
                check_length(value, MAX_NAME_LEN, field)?;
            }
        }
        let totals = OrderTotals::from_items(&items);
        limits::money(&totals.subtotal, "Order subtotal")?;
        limits::money(&totals.total, "Order total")?;

        Ok(Order {
            order_id,
            user_id: self.user_id,
            username: self.username,
            items,
            address,
            payment_method,
            subtotal: totals.subtotal,
            savings: totals.savings,
            total: totals.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Order {
    /// Moves the order to `next` if the state machine allows it.
    pub fn transition_to(&mut self, next: OrderStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        ensure_transition(self.status, next)?;
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

pub fn ensure_transition(current: OrderStatus, next: OrderStatus) -> Result<(), DomainError> {
    if current.can_transition_to(next) {
        return Ok(());
    }
    if current == next || current.is_terminal() {
        return Err(DomainError::invalid(format!("Order is already {}", current)));
    }
    Err(DomainError::invalid(format!(
        "Cannot change order status from {} to {}",
        current, next
    )))
}
