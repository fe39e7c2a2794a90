use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ensure_transition, Order, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{OrderItemRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_items(conn: &mut PgConnection, order_id: &str) -> Result<Vec<OrderItemRow>, DomainError> {
    Ok(order_items::table
        .filter(order_items::order_id.eq(order_id))
        .select(OrderItemRow::as_select())
        .order(order_items::position.asc())
        .load(conn)?)
}

impl OrderRepository for DieselOrderRepository {
    fn insert(&self, order: Order) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(orders::table)
                .values(&OrderRow::from_order(&order))
                .execute(conn)?;

            let items: Vec<OrderItemRow> = order
                .items
                .iter()
                .enumerate()
                .map(|(position, item)| OrderItemRow::from_item(&order.order_id, position, item))
                .collect();
            diesel::insert_into(order_items::table)
                .values(&items)
                .execute(conn)?;

            Ok(())
        })?;

        Ok(order)
    }

    fn list(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .into_boxed();
        if let Some(username) = username {
            query = query.filter(orders::username.eq(username.to_string()));
        }
        let rows = query.load(&mut conn)?;

        let items = OrderItemRow::belonging_to(&rows)
            .select(OrderItemRow::as_select())
            .order(order_items::position.asc())
            .load(&mut conn)?;

        items
            .grouped_by(&rows)
            .into_iter()
            .zip(rows)
            .map(|(items, row)| row.into_order(items))
            .collect()
    }

    fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .find(order_id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let items = load_items(&mut conn, &row.order_id)?;
        row.into_order(items).map(Some)
    }

    fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = orders::table
                .find(order_id)
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Ok(None);
            };

            let current: OrderStatus = row
                .status
                .parse()
                .map_err(|e: DomainError| DomainError::Internal(e.to_string()))?;
            ensure_transition(current, status)?;

            let row = diesel::update(orders::table.find(order_id))
                .set((
                    orders::status.eq(status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let items = load_items(conn, order_id)?;
            row.into_order(items).map(Some)
        })
    }
}
