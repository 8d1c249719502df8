//! In-memory doubles of the storage ports for service and handler tests.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::application::notifications::NotificationDispatcher;
use crate::config::PasswordSettings;
use crate::domain::cart::{
    quantity_too_large, validate_quantity, CartLine, CartLineView, MAX_LINE_QUANTITY,
};
use crate::domain::errors::{DomainError, NotifyError};
use crate::domain::order::{order_total, CustomerContact, Order, OrderLine, OrderStatus, PricedLine};
use crate::domain::ports::{CartRepository, Mailer, OrderRepository, ProductCatalog, UserRepository};
use crate::domain::product::Product;
use crate::domain::user::{StoredCredential, User};
use crate::infrastructure::password::PasswordHasher;
use crate::AppState;

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal")
}

pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(PasswordSettings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid params")
}

pub struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp unreachable".into()))
    }
}

#[derive(Default)]
struct State {
    next_id: i32,
    users: Vec<StoredCredential>,
    products: Vec<Product>,
    cart: Vec<CartLine>,
    orders: Vec<Order>,
    fail_next_order: bool,
}

impl State {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store lock poisoned")
    }

    pub fn add_user(&self, email: &str) -> i32 {
        self.create(email, "unused-hash").expect("user insert failed").id
    }

    pub fn add_product(&self, name: &str, price: &str) -> i32 {
        let mut state = self.state();
        let id = state.id();
        state.products.push(Product {
            id,
            name: name.to_string(),
            price: dec(price),
            product_type: "wheels".into(),
            image: String::new(),
            description: String::new(),
        });
        id
    }

    pub fn cart_line_count(&self) -> usize {
        self.state().cart.len()
    }

    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    /// The next `place` call fails as if the transaction had aborted.
    pub fn fail_next_order(&self) {
        self.state().fail_next_order = true;
    }
}

impl ProductCatalog for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.state().products.clone())
    }

    fn find(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.state().products.iter().find(|p| p.id == id).cloned())
    }
}

impl CartRepository for InMemoryStore {
    fn lines(&self, user_id: i32) -> Result<Vec<CartLineView>, DomainError> {
        let state = self.state();
        Ok(state
            .cart
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|line| {
                let product = state.products.iter().find(|p| p.id == line.product_id)?;
                Some(CartLineView {
                    line: line.clone(),
                    product: product.clone(),
                })
            })
            .collect())
    }

    fn find(&self, line_id: i32) -> Result<Option<CartLine>, DomainError> {
        Ok(self.state().cart.iter().find(|l| l.id == line_id).cloned())
    }

    fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        let mut state = self.state();
        if !state.products.iter().any(|p| p.id == product_id) {
            return Err(DomainError::NotFound("Product"));
        }
        if let Some(line) = state
            .cart
            .iter_mut()
            .find(|l| l.user_id == user_id && l.product_id == product_id)
        {
            if line.quantity + quantity > MAX_LINE_QUANTITY {
                return Err(quantity_too_large());
            }
            line.quantity += quantity;
            return Ok(());
        }
        let id = state.id();
        state.cart.push(CartLine {
            id,
            user_id,
            product_id,
            quantity,
        });
        Ok(())
    }

    fn update(&self, line_id: i32, quantity: i32) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        let mut state = self.state();
        let line = state
            .cart
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(DomainError::NotFound("Cart item"))?;
        line.quantity = quantity;
        Ok(())
    }

    fn remove(&self, line_id: i32) -> Result<(), DomainError> {
        self.state().cart.retain(|l| l.id != line_id);
        Ok(())
    }

    fn clear(&self, user_id: i32) -> Result<(), DomainError> {
        self.state().cart.retain(|l| l.user_id != user_id);
        Ok(())
    }
}

impl OrderRepository for InMemoryStore {
    fn place(&self, user_id: i32, contact: &CustomerContact) -> Result<Order, DomainError> {
        let mut state = self.state();
        if std::mem::take(&mut state.fail_next_order) {
            return Err(DomainError::Persistence("injected fault".into()));
        }

        let snapshot: Vec<PricedLine> = state
            .cart
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|line| {
                let product = state.products.iter().find(|p| p.id == line.product_id)?;
                Some(PricedLine {
                    cart_line_id: line.id,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    quantity: line.quantity,
                    unit_price: product.price.clone(),
                })
            })
            .collect();

        let order_id = state.id();
        let mut lines = Vec::with_capacity(snapshot.len());
        for priced in &snapshot {
            let id = state.id();
            lines.push(OrderLine {
                id,
                order_id,
                product_id: priced.product_id,
                product_name: priced.product_name.clone(),
                quantity: priced.quantity,
                unit_price: priced.unit_price.clone(),
            });
        }
        let order = Order {
            id: order_id,
            user_id,
            contact: contact.clone(),
            total_price: order_total(&snapshot),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            lines,
        };

        state
            .cart
            .retain(|l| !snapshot.iter().any(|s| s.cart_line_id == l.id));
        state.orders.push(order.clone());
        Ok(order)
    }

    fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .state()
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl UserRepository for InMemoryStore {
    fn create(&self, email: &str, password_hash: &str) -> Result<User, DomainError> {
        let mut state = self.state();
        if state.users.iter().any(|c| c.user.email == email) {
            return Err(DomainError::Conflict("Email already registered".into()));
        }
        let now = Utc::now();
        let user = User {
            id: state.id(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(StoredCredential {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(user)
    }

    fn find_credential(&self, email: &str) -> Result<Option<StoredCredential>, DomainError> {
        Ok(self.state().users.iter().find(|c| c.user.email == email).cloned())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }
}

/// Application state backed entirely by `store`, with email disabled.
pub fn app_state(store: &Arc<InMemoryStore>) -> AppState {
    AppState::from_parts(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        fast_hasher(),
        NotificationDispatcher::disabled(),
    )
}
