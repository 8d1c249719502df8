use super::cart::{CartLine, CartLineView};
use super::errors::{DomainError, NotifyError};
use super::order::{CustomerContact, Order};
use super::product::Product;
use super::user::{StoredCredential, User};

pub trait ProductCatalog: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn find(&self, id: i32) -> Result<Option<Product>, DomainError>;
}

/// Durable per-user cart. Line-addressed operations do not check ownership;
/// callers pass only line ids that belong to the authenticated user.
pub trait CartRepository: Send + Sync + 'static {
    fn lines(&self, user_id: i32) -> Result<Vec<CartLineView>, DomainError>;
    fn find(&self, line_id: i32) -> Result<Option<CartLine>, DomainError>;
    /// Inserts the line or increments the existing one in a single statement.
    fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<(), DomainError>;
    fn update(&self, line_id: i32, quantity: i32) -> Result<(), DomainError>;
    fn remove(&self, line_id: i32) -> Result<(), DomainError>;
    fn clear(&self, user_id: i32) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Converts the user's cart into an order in one transaction.
    fn place(&self, user_id: i32, contact: &CustomerContact) -> Result<Order, DomainError>;
    /// Newest first, each with its lines.
    fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, email: &str, password_hash: &str) -> Result<User, DomainError>;
    fn find_credential(&self, email: &str) -> Result<Option<StoredCredential>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
}

pub trait Mailer: Send + Sync + 'static {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}
