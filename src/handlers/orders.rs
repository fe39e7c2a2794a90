use std::str::FromStr;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{decimal, money, ApiResponse};
use crate::application::SharedOrderService;
use crate::domain::order::{
    AddressDraft, Order, OrderAddress, OrderDraft, OrderItem, OrderStatus,
};
use crate::errors::{failed, AppError};

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Product id.
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub price: f64,
    /// Defaults to `price`.
    pub original_price: Option<f64>,
    pub quantity: i32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub unit: String,
}

impl OrderItemRequest {
    fn into_item(self) -> Result<OrderItem, AppError> {
        let price = decimal(self.price, "price")?;
        let original_price = match self.original_price {
            Some(p) => decimal(p, "originalPrice")?,
            None => price.clone(),
        };
        Ok(OrderItem {
            product_id: self.id,
            name: self.name,
            price,
            original_price,
            quantity: self.quantity,
            image: self.image,
            unit: self.unit,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin: Option<String>,
}

impl From<AddressRequest> for AddressDraft {
    fn from(a: AddressRequest) -> Self {
        AddressDraft {
            name: a.name,
            phone: a.phone,
            street: a.street,
            city: a.city,
            state: a.state,
            pin: a.pin,
        }
    }
}

/// Totals are computed on the server; any sent by the client are ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub items: Option<Vec<OrderItemRequest>>,
    pub address: Option<AddressRequest>,
    /// `cod` or `upi`.
    pub payment_method: Option<String>,
}

impl CreateOrderRequest {
    fn into_draft(self) -> Result<OrderDraft, AppError> {
        let items = self
            .items
            .map(|items| {
                items
                    .into_iter()
                    .map(OrderItemRequest::into_item)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(OrderDraft {
            user_id: self.user_id,
            username: self.username,
            items,
            address: self.address.map(AddressDraft::from),
            payment_method: self.payment_method,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `confirmed`, `processing`, `shipped`, `delivered`,
    /// `cancelled`.
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    fn parse(self) -> Result<OrderStatus, AppError> {
        let raw = self.status.unwrap_or_default();
        if raw.trim().is_empty() {
            return Err(AppError::validation("Status is required"));
        }
        OrderStatus::from_str(raw.trim()).map_err(|e| AppError::from_domain(e, "Invalid status"))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListParams {
    /// Exact username match.
    pub username: Option<String>,
}

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub original_price: f64,
    pub quantity: i32,
    pub image: String,
    pub unit: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pin: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub address: AddressResponse,
    pub payment_method: String,
    pub subtotal: f64,
    pub savings: f64,
    pub total: f64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        Self {
            id: i.product_id,
            price: money(&i.price),
            original_price: money(&i.original_price),
            name: i.name,
            quantity: i.quantity,
            image: i.image,
            unit: i.unit,
        }
    }
}

impl From<OrderAddress> for AddressResponse {
    fn from(a: OrderAddress) -> Self {
        Self {
            name: a.name,
            phone: a.phone,
            street: a.street,
            city: a.city,
            state: a.state,
            pin: a.pin,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            subtotal: money(&o.subtotal),
            savings: money(&o.savings),
            total: money(&o.total),
            payment_method: o.payment_method.as_str().to_string(),
            status: o.status.as_str().to_string(),
            created_at: timestamp(&o.created_at),
            updated_at: timestamp(&o.updated_at),
            order_id: o.order_id,
            user_id: o.user_id,
            username: o.username,
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
            address: o.address.into(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Validates the checkout input, computes totals from the item snapshots and
/// stores the order as `pending`. Nothing is written when validation fails.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Missing items, address or payment method"),
        (status = 500, description = "Failed to create order"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<SharedOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;
    let order = web::block(move || service.create_order(draft))
        .await?
        .map_err(failed("Failed to create order"))?;

    Ok(HttpResponse::Created().json(
        ApiResponse::data(OrderResponse::from(order)).with_message("Order placed successfully"),
    ))
}

/// GET /api/orders
///
/// Newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListParams),
    responses(
        (status = 200, description = "Orders", body = [OrderResponse]),
        (status = 500, description = "Failed to fetch orders"),
    ),
    tag = "orders"
)]
pub async fn get_orders(
    service: web::Data<SharedOrderService>,
    query: web::Query<OrderListParams>,
) -> Result<HttpResponse, AppError> {
    let username = query.into_inner().username.filter(|u| !u.is_empty());
    let orders = web::block(move || service.get_all_orders(username.as_deref()))
        .await?
        .map_err(failed("Failed to fetch orders"))?;

    let orders: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::list(orders)))
}

/// GET /api/orders/{orderId}
#[utoipa::path(
    get,
    path = "/api/orders/{orderId}",
    params(("orderId" = String, Path, description = "Order id, e.g. ORD17000000000000001")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Failed to fetch order"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = web::block(move || service.get_order_by_id(&order_id))
        .await?
        .map_err(failed("Failed to fetch order"))?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(OrderResponse::from(order))))
}

/// PATCH /api/orders/{orderId}/status
///
/// Moves the order along its lifecycle; transitions outside the lifecycle
/// are rejected with 400.
#[utoipa::path(
    patch,
    path = "/api/orders/{orderId}/status",
    params(("orderId" = String, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Missing, unknown or disallowed status"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Failed to update order status"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().parse()?;
    let order = web::block(move || service.update_order_status(&order_id, status))
        .await?
        .map_err(failed("Failed to update order status"))?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::data(OrderResponse::from(order))
            .with_message("Order status updated successfully"),
    ))
}

/// PATCH /api/orders/{orderId}/cancel
#[utoipa::path(
    patch,
    path = "/api/orders/{orderId}/cancel",
    params(("orderId" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 400, description = "Order can no longer be cancelled"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Failed to cancel order"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = web::block(move || service.cancel_order(&order_id))
        .await?
        .map_err(failed("Failed to cancel order"))?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::data(OrderResponse::from(order)).with_message("Order cancelled successfully"),
    ))
}
