//! Best-effort order emails.
//!
//! Nothing in here can fail an order: every transport error is logged and
//! dropped, and an unconfigured dispatcher silently does nothing.

use std::fmt::Write as _;
use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::config::EmailSettings;
use crate::domain::order::Order;
use crate::domain::ports::Mailer;
use crate::infrastructure::mailer::SmtpMailer;

struct Transport {
    mailer: Arc<dyn Mailer>,
    admin_email: String,
    store_name: String,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Option<Arc<Transport>>,
}

impl NotificationDispatcher {
    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn new(mailer: Arc<dyn Mailer>, admin_email: String, store_name: String) -> Self {
        Self {
            transport: Some(Arc::new(Transport {
                mailer,
                admin_email,
                store_name,
            })),
        }
    }

    /// SMTP-backed dispatcher, or a disabled one when credentials are missing.
    pub fn from_settings(settings: &EmailSettings) -> Self {
        if !settings.is_configured() {
            log::info!("Email not configured - order notifications disabled");
            return Self::disabled();
        }
        match SmtpMailer::new(settings) {
            Ok(mailer) => Self::new(
                Arc::new(mailer),
                settings.admin_email.clone(),
                settings.from_name.clone(),
            ),
            Err(e) => {
                log::warn!("Invalid email configuration ({e}) - order notifications disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Sends both emails on a background thread and returns immediately.
    /// Outside a Tokio runtime the emails are sent inline.
    pub fn dispatch(&self, order: Order) {
        if !self.is_enabled() {
            log::info!("Email not configured - skipping notifications for order #{}", order.id);
            return;
        }
        let dispatcher = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                drop(handle.spawn_blocking(move || dispatcher.deliver(&order)));
            }
            Err(_) => dispatcher.deliver(&order),
        }
    }

    fn deliver(&self, order: &Order) {
        self.notify_admin(order);
        self.notify_customer(order);
    }

    pub fn notify_admin(&self, order: &Order) {
        let Some(transport) = &self.transport else {
            log::info!("Email not configured - skipping admin notification");
            return;
        };
        let subject = format!("New Order #{} from {}", order.id, order.contact.email);
        let body = admin_body(order, &transport.store_name);
        send(transport, &transport.admin_email, &subject, &body);
    }

    pub fn notify_customer(&self, order: &Order) {
        let Some(transport) = &self.transport else {
            log::info!("Email not configured - skipping customer confirmation");
            return;
        };
        let subject = format!("Order Confirmation #{} - {}", order.id, transport.store_name);
        let body = customer_body(order, &transport.store_name);
        send(transport, &order.contact.email, &subject, &body);
    }
}

fn send(transport: &Transport, to: &str, subject: &str, body: &str) {
    match transport.mailer.send(to, subject, body) {
        Ok(()) => log::info!("Email sent successfully to {to}"),
        Err(e) => log::warn!("Failed to send email to {to}: {e}"),
    }
}

fn money(amount: &BigDecimal) -> String {
    format!("€{}", amount.with_scale(2))
}

fn item_list(order: &Order) -> String {
    let mut list = String::new();
    for line in &order.lines {
        let extension = &line.unit_price * BigDecimal::from(line.quantity);
        // Writing into a String cannot fail.
        let _ = writeln!(
            list,
            "- {} x{} @ {} = {}",
            line.product_name,
            line.quantity,
            money(&line.unit_price),
            money(&extension)
        );
    }
    list
}

fn admin_body(order: &Order, store_name: &str) -> String {
    format!(
        "New Order Received!\n\n\
         Order ID: #{id}\n\
         Customer Email: {email}\n\
         Customer Name: {name}\n\
         Phone: {phone}\n\
         Shipping Address: {address}\n\n\
         Items Ordered:\n{items}\n\
         Total: {total}\n\n\
         Status: {status}\n\n\
         Please contact the customer to arrange delivery and payment.\n\n\
         ---\n\
         {store_name} Order System\n",
        id = order.id,
        email = order.contact.email,
        name = order.contact.name,
        phone = order.contact.phone,
        address = order.contact.address,
        items = item_list(order),
        total = money(&order.total_price),
        status = order.status,
    )
}

fn customer_body(order: &Order, store_name: &str) -> String {
    format!(
        "Thank you for your order!\n\n\
         Order ID: #{id}\n\n\
         We have received your order and will contact you shortly to arrange delivery and payment.\n\n\
         Order Details:\n{items}\n\
         Total: {total}\n\n\
         Your Contact Information:\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Shipping Address: {address}\n\n\
         We will be in touch soon to finalize the details.\n\n\
         Best regards,\n\
         {store_name} Team\n",
        id = order.id,
        items = item_list(order),
        total = money(&order.total_price),
        name = order.contact.name,
        email = order.contact.email,
        phone = order.contact.phone,
        address = order.contact.address,
    )
}
