use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::{Order, OrderLine};
use crate::errors::AppError;
use crate::session::CurrentUser;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price captured when the order was placed.
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub phone: String,
    pub address: String,
    pub total_price: String,
    pub status: String,
    pub created_at: String,
    pub items: Vec<OrderLineResponse>,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(l: OrderLine) -> Self {
        Self {
            id: l.id,
            order_id: l.order_id,
            product_id: l.product_id,
            product_name: l.product_name,
            quantity: l.quantity,
            price: l.unit_price.to_string(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            customer_name: o.contact.name,
            customer_email: o.contact.email,
            phone: o.contact.phone,
            address: o.contact.address,
            total_price: o.total_price.to_string(),
            status: o.status.to_string(),
            created_at: o.created_at.to_rfc3339(),
            items: o.lines.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Converts the caller's cart into a pending order. The order header, its
/// lines, and the cart deletion commit in a single database transaction;
/// confirmation emails are sent afterwards and never affect the response.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Missing contact field"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let order = web::block(move || {
        state.orders.place_order(
            user.0,
            &body.customer_name,
            &body.customer_email,
            &body.phone,
            &body.address,
        )
    })
    .await??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// Returns the caller's orders, newest first, with their lines.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders, empty if none", body = Vec<OrderResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || state.orders.list_orders(user.0)).await??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
