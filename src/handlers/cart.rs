use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::products::ProductResponse;
use super::MessageResponse;
use crate::domain::cart::CartLineView;
use crate::errors::AppError;
use crate::session::CurrentUser;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Quantity times the current catalog price.
    pub subtotal: String,
    /// Product data at its current catalog price.
    pub product: ProductResponse,
}

impl From<CartLineView> for CartLineResponse {
    fn from(view: CartLineView) -> Self {
        Self {
            id: view.line.id,
            user_id: view.line.user_id,
            product_id: view.line.product_id,
            quantity: view.line.quantity,
            subtotal: view.subtotal().to_string(),
            product: view.product.into(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/cart
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines, empty if none", body = Vec<CartLineResponse>),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let lines = web::block(move || state.carts.list(user.0)).await??;

    let body: Vec<CartLineResponse> = lines.into_iter().map(CartLineResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/cart
///
/// Adds the product or increases the quantity of the existing line.
#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = MessageResponse),
        (status = 400, description = "Quantity outside 1 to 10000"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown product"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    web::block(move || state.carts.add(user.0, body.product_id, body.quantity)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Item added to cart")))
}

/// PUT /api/cart/{id}
#[utoipa::path(
    put,
    path = "/api/cart/{id}",
    params(
        ("id" = i32, Path, description = "Cart line id"),
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = MessageResponse),
        (status = 400, description = "Quantity outside 1 to 10000"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such line in the user's cart"),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let quantity = body.into_inner().quantity;

    web::block(move || state.carts.update(user.0, line_id, quantity)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Cart item updated")))
}

/// DELETE /api/cart/{id}
#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(
        ("id" = i32, Path, description = "Cart line id"),
    ),
    responses(
        (status = 200, description = "Line removed (or already absent)", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();

    web::block(move || state.carts.remove(user.0, line_id)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Item removed from cart")))
}

/// DELETE /api/cart
#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    web::block(move || state.carts.clear(user.0)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Cart cleared")))
}
