use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDraft, OrderStatus};
use crate::domain::ports::OrderRepository;

pub const ORDER_ID_PREFIX: &str = "ORD";
/// Fresh ids tried when the store reports an id collision.
const ORDER_ID_ATTEMPTS: usize = 3;

/// Issues `ORD<epoch millis><4-digit sequence>` ids. The sequence makes ids
/// from the same process unique unless more than 10 000 orders land in one
/// millisecond; the store's primary key catches anything beyond that.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    sequence: AtomicU32,
}

impl OrderIdGenerator {
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) % 10_000;
        format!("{}{}{:04}", ORDER_ID_PREFIX, now.timestamp_millis(), seq)
    }
}

pub struct OrderService<R> {
    repo: R,
    ids: OrderIdGenerator,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            ids: OrderIdGenerator::default(),
        }
    }

    /// Validates the draft before touching the store; an invalid draft
    /// persists nothing. An id collision is retried with a new id and never
    /// reaches the client as a conflict.
    pub fn create_order(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let now = Utc::now();
        let mut order = draft.into_order(self.ids.next_id(now), now)?;
        let mut attempt = 1;
        let order = loop {
            match self.repo.insert(order.clone()) {
                Ok(stored) => break stored,
                Err(DomainError::Conflict(_)) if attempt < ORDER_ID_ATTEMPTS => {
                    log::warn!("Order id {} already taken, retrying", order.order_id);
                    order.order_id = self.ids.next_id(Utc::now());
                    attempt += 1;
                }
                Err(DomainError::Conflict(_)) => {
                    return Err(DomainError::Internal(format!(
                        "No free order id after {} attempts",
                        ORDER_ID_ATTEMPTS
                    )))
                }
                Err(e) => return Err(e),
            }
        };
        log::info!(
            "Created order {} ({} items, total {})",
            order.order_id,
            order.items.len(),
            order.total
        );
        Ok(order)
    }

    pub fn get_all_orders(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError> {
        self.repo.list(username)
    }

    pub fn get_order_by_id(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        self.repo.find_by_id(order_id)
    }

    pub fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError> {
        let updated = self.repo.update_status(order_id, status)?;
        if updated.is_some() {
            log::info!("Order {} is now {}", order_id, status);
        }
        Ok(updated)
    }

    pub fn cancel_order(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        self.update_order_status(order_id, OrderStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::order::{AddressDraft, OrderItem};
    use crate::infrastructure::memory::InMemoryOrderRepository;

    fn rice(quantity: i32) -> OrderItem {
        OrderItem {
            product_id: 1,
            name: "Rice".to_string(),
            price: BigDecimal::from(90),
            original_price: BigDecimal::from(100),
            quantity,
            image: "x".to_string(),
            unit: "1kg".to_string(),
        }
    }

    fn draft(username: Option<&str>) -> OrderDraft {
        OrderDraft {
            username: username.map(str::to_string),
            items: Some(vec![rice(2)]),
            address: Some(AddressDraft {
                name: Some("A".to_string()),
                phone: Some("1".to_string()),
                street: Some("S".to_string()),
                city: Some("C".to_string()),
                state: Some("ST".to_string()),
                pin: Some("000".to_string()),
            }),
            payment_method: Some("cod".to_string()),
            ..Default::default()
        }
    }

    fn service() -> OrderService<InMemoryOrderRepository> {
        OrderService::new(InMemoryOrderRepository::new())
    }

    /// Rejects the first `collisions` inserts as duplicates, then stores.
    struct CollidingIds {
        collisions: usize,
        attempts: std::sync::Mutex<Vec<String>>,
        store: InMemoryOrderRepository,
    }

    impl CollidingIds {
        fn new(collisions: usize) -> Self {
            Self {
                collisions,
                attempts: std::sync::Mutex::new(Vec::new()),
                store: InMemoryOrderRepository::new(),
            }
        }
    }

    impl OrderRepository for CollidingIds {
        fn insert(&self, order: Order) -> Result<Order, DomainError> {
            let mut attempts = self.attempts.lock().expect("attempts lock");
            attempts.push(order.order_id.clone());
            if attempts.len() <= self.collisions {
                return Err(DomainError::Conflict("duplicate key".to_string()));
            }
            self.store.insert(order)
        }
        fn list(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError> {
            self.store.list(username)
        }
        fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
            self.store.find_by_id(order_id)
        }
        fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError> {
            self.store.update_status(order_id, status)
        }
    }

    #[test]
    fn id_collision_is_retried_with_a_fresh_id() {
        let service = OrderService::new(CollidingIds::new(1));
        let order = service.create_order(draft(None)).expect("create");

        let attempts = service.repo.attempts.lock().expect("attempts lock").clone();
        assert_eq!(attempts.len(), 2);
        assert_ne!(attempts[0], attempts[1]);
        assert_eq!(order.order_id, attempts[1]);
        assert!(service.get_order_by_id(&order.order_id).expect("get").is_some());
    }

    #[test]
    fn persistent_id_collisions_are_internal_errors() {
        let service = OrderService::new(CollidingIds::new(usize::MAX));
        let result = service.create_order(draft(None));

        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(
            service.repo.attempts.lock().expect("attempts lock").len(),
            ORDER_ID_ATTEMPTS
        );
        assert!(service.get_all_orders(None).expect("list").is_empty());
    }

    #[test]
    fn order_ids_are_prefixed_digits_and_unique() {
        let ids = OrderIdGenerator::default();
        let now = Utc::now();
        let first = ids.next_id(now);
        let second = ids.next_id(now);

        assert!(first.starts_with(ORDER_ID_PREFIX));
        assert!(first[ORDER_ID_PREFIX.len()..].chars().all(|c| c.is_ascii_digit()));
        assert_ne!(first, second);
    }

    #[test]
    fn create_order_computes_totals_and_starts_pending() {
        let service = service();
        let order = service.create_order(draft(Some("asha"))).expect("create");

        assert!(order.order_id.starts_with("ORD"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(order.subtotal, BigDecimal::from(200));
        assert_eq!(order.total, BigDecimal::from(180));
        assert_eq!(order.savings, BigDecimal::from(20));
    }

    #[test]
    fn empty_items_are_rejected_and_nothing_is_stored() {
        let service = service();
        let mut empty = draft(None);
        empty.items = Some(vec![]);

        let result = service.create_order(empty);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert!(service.get_all_orders(None).expect("list").is_empty());
    }

    #[test]
    fn list_filters_by_exact_username() {
        let service = service();
        service.create_order(draft(Some("asha"))).expect("create");
        service.create_order(draft(Some("ravi"))).expect("create");
        service.create_order(draft(None)).expect("create");

        assert_eq!(service.get_all_orders(None).expect("list").len(), 3);
        let asha = service.get_all_orders(Some("asha")).expect("list");
        assert_eq!(asha.len(), 1);
        assert_eq!(asha[0].username.as_deref(), Some("asha"));
        assert!(service.get_all_orders(Some("Asha")).expect("list").is_empty());
    }

    #[test]
    fn status_walks_to_delivered_and_refreshes_updated_at() {
        let service = service();
        let created = service.create_order(draft(None)).expect("create");
        let mut last = created.updated_at;

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            std::thread::sleep(Duration::from_millis(2));
            let updated = service
                .update_order_status(&created.order_id, status)
                .expect("update")
                .expect("order exists");
            assert!(updated.updated_at > last);
            last = updated.updated_at;
        }

        let fetched = service
            .get_order_by_id(&created.order_id)
            .expect("get")
            .expect("order exists");
        assert_eq!(fetched.status, OrderStatus::Delivered);
        assert_eq!(fetched.updated_at, last);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn delivered_cannot_go_back_to_pending() {
        let service = service();
        let created = service.create_order(draft(None)).expect("create");
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            service
                .update_order_status(&created.order_id, status)
                .expect("update");
        }

        let result = service.update_order_status(&created.order_id, OrderStatus::Pending);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn cancel_is_a_status_update() {
        let service = service();
        let created = service.create_order(draft(None)).expect("create");

        let cancelled = service
            .cancel_order(&created.order_id)
            .expect("cancel")
            .expect("order exists");
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(service.cancel_order("ORD0").expect("cancel").is_none());
    }

    #[test]
    fn returned_orders_are_snapshots() {
        let service = service();
        let created = service.create_order(draft(None)).expect("create");
        service.cancel_order(&created.order_id).expect("cancel");

        assert_eq!(created.status, OrderStatus::Pending);
    }
}
