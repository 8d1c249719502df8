use std::sync::Arc;

use crate::domain::cart::{validate_quantity, CartLineView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

/// Cart operations on behalf of an authenticated user. Line-addressed calls
/// are checked against the caller's id before reaching the store.
#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>) -> Self {
        Self { carts }
    }

    pub fn list(&self, user_id: i32) -> Result<Vec<CartLineView>, DomainError> {
        self.carts.lines(user_id)
    }

    pub fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        self.carts.add(user_id, product_id, quantity)
    }

    /// A line owned by someone else is reported as missing.
    pub fn update(&self, user_id: i32, line_id: i32, quantity: i32) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        match self.carts.find(line_id)? {
            Some(line) if line.user_id == user_id => self.carts.update(line_id, quantity),
            _ => Err(DomainError::NotFound("Cart item")),
        }
    }

    /// Idempotent; removing a missing or foreign line does nothing.
    pub fn remove(&self, user_id: i32, line_id: i32) -> Result<(), DomainError> {
        match self.carts.find(line_id)? {
            Some(line) if line.user_id == user_id => self.carts.remove(line_id),
            _ => Ok(()),
        }
    }

    pub fn clear(&self, user_id: i32) -> Result<(), DomainError> {
        self.carts.clear(user_id)
    }
}
