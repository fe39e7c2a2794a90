use std::sync::Mutex;

use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::OrderRepository;

use super::lock;

/// Orders kept newest-insertion-first.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, order: Order) -> Result<Order, DomainError> {
        let mut orders = lock(&self.orders)?;
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(DomainError::Conflict(format!(
                "Order {} already exists",
                order.order_id
            )));
        }
        orders.insert(0, order.clone());
        Ok(order)
    }

    fn list(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError> {
        let orders = lock(&self.orders)?;
        let mut matching: Vec<Order> = orders
            .iter()
            .filter(|o| username.is_none() || o.username.as_deref() == username)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        let orders = lock(&self.orders)?;
        Ok(orders.iter().find(|o| o.order_id == order_id).cloned())
    }

    fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut orders = lock(&self.orders)?;
        let Some(order) = orders.iter_mut().find(|o| o.order_id == order_id) else {
            return Ok(None);
        };
        order.transition_to(status, Utc::now())?;
        Ok(Some(order.clone()))
    }
}
