use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::product::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// A cart line joined with the product's current catalog data.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub line: CartLine,
    pub product: Product,
}

impl CartLineView {
    /// Quantity times the current catalog price.
    pub fn subtotal(&self) -> BigDecimal {
        &self.product.price * BigDecimal::from(self.line.quantity)
    }
}

/// Upper bound for one cart or order line, mirrored by the `CHECK`
/// constraints on `cart_items` and `order_items`.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Rejects quantities outside `1..=MAX_LINE_QUANTITY` before they reach storage.
pub fn validate_quantity(quantity: i32) -> Result<i32, DomainError> {
    if quantity <= 0 {
        return Err(DomainError::InvalidArgument(format!(
            "quantity must be greater than 0, got {quantity}"
        )));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(quantity_too_large());
    }
    Ok(quantity)
}

pub fn quantity_too_large() -> DomainError {
    DomainError::InvalidArgument(format!(
        "quantity must be at most {MAX_LINE_QUANTITY} per item"
    ))
}
