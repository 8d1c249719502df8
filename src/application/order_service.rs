use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{CustomerContact, Order};
use crate::domain::ports::OrderRepository;

use super::notifications::NotificationDispatcher;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    notifications: NotificationDispatcher,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, notifications: NotificationDispatcher) -> Self {
        Self {
            orders,
            notifications,
        }
    }

    /// Converts the user's cart into a pending order. An empty cart yields a
    /// zero-line order. Notifications go out only after the commit and cannot
    /// affect the result.
    pub fn place_order(
        &self,
        user_id: i32,
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
    ) -> Result<Order, DomainError> {
        let contact = CustomerContact::new(name, email, phone, address)?;

        let order = self.orders.place(user_id, &contact)?;
        log::info!(
            "Order #{} placed by user {} ({} lines, total {})",
            order.id,
            user_id,
            order.lines.len(),
            order.total_price
        );

        self.notifications.dispatch(order.clone());
        Ok(order)
    }

    pub fn list_orders(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        self.orders.list_for_user(user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::OrderService;
    use crate::application::notifications::NotificationDispatcher;
    use crate::domain::errors::DomainError;
    use crate::domain::ports::CartRepository;
    use crate::test_support::{dec, FailingMailer, InMemoryStore};

    #[test]
    fn scenario_two_products_total_25_and_cart_empty() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.add_user("jane@x.com");
        let a = store.add_product("A", "10");
        let b = store.add_product("B", "5");
        store.add(user, a, 2).expect("add failed");
        store.add(user, b, 1).expect("add failed");
        let service = OrderService::new(store.clone(), NotificationDispatcher::disabled());

        let order = service
            .place_order(user, "Jane", "jane@x.com", "+1", "Addr")
            .expect("place failed");

        assert_eq!(order.total_price, dec("25"));
        let lines: Vec<_> = order
            .lines
            .iter()
            .map(|l| (l.product_id, l.quantity, l.unit_price.clone()))
            .collect();
        assert_eq!(lines, vec![(a, 2, dec("10")), (b, 1, dec("5"))]);
        assert!(store.lines(user).expect("lines failed").is_empty());
    }

    #[test]
    fn missing_contact_field_is_rejected_before_storage() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.add_user("jane@x.com");
        let a = store.add_product("A", "10");
        store.add(user, a, 1).expect("add failed");
        let service = OrderService::new(store.clone(), NotificationDispatcher::disabled());

        let err = service
            .place_order(user, "Jane", "", "+1", "Addr")
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.lines(user).expect("lines failed").len(), 1);
    }

    #[test]
    fn storage_failure_surfaces_and_keeps_cart() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.add_user("jane@x.com");
        let a = store.add_product("A", "10");
        store.add(user, a, 2).expect("add failed");
        store.fail_next_order();
        let service = OrderService::new(store.clone(), NotificationDispatcher::disabled());

        let err = service
            .place_order(user, "Jane", "jane@x.com", "+1", "Addr")
            .unwrap_err();

        assert!(matches!(err, DomainError::Persistence(_)));
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.lines(user).expect("lines failed")[0].line.quantity, 2);
    }

    #[test]
    fn notification_failure_does_not_fail_the_order() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.add_user("jane@x.com");
        let a = store.add_product("A", "10");
        store.add(user, a, 1).expect("add failed");
        let notifications =
            NotificationDispatcher::new(Arc::new(FailingMailer), "admin@x.com".into(), "Shop".into());
        let service = OrderService::new(store.clone(), notifications);

        let order = service
            .place_order(user, "Jane", "jane@x.com", "+1", "Addr")
            .expect("order must survive notification failure");

        let listed = service.list_orders(user).expect("list failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, order.id);
    }
}
