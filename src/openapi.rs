use utoipa::OpenApi;

use crate::handlers::{auth, cart, orders, products, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", version = "0.1.0"),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::current_user,
        products::list_products,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::place_order,
        orders::list_orders,
    ),
    components(schemas(
        MessageResponse,
        auth::CredentialsRequest,
        auth::UserResponse,
        products::ProductResponse,
        cart::AddToCartRequest,
        cart::UpdateCartItemRequest,
        cart::CartLineResponse,
        orders::PlaceOrderRequest,
        orders::OrderResponse,
        orders::OrderLineResponse,
    )),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "products", description = "Product catalog"),
        (name = "cart", description = "Shopping cart of the logged-in user"),
        (name = "orders", description = "Checkout and order history"),
    )
)]
pub struct ApiDoc;
