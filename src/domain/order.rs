use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;

/// Contact and delivery details captured on the order at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Column widths of `orders.customer_name`, `customer_email` and `phone`.
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 50;

impl CustomerContact {
    /// Trims every field and fails if any of them ends up empty or longer
    /// than its column.
    pub fn new(
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, DomainError> {
        let fields = [name.trim(), email.trim(), phone.trim(), address.trim()];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(DomainError::InvalidArgument(
                "All contact fields are required (name, email, phone, address)".into(),
            ));
        }
        for (field, value, max) in [
            ("customer_name", fields[0], MAX_NAME_LEN),
            ("customer_email", fields[1], MAX_EMAIL_LEN),
            ("phone", fields[2], MAX_PHONE_LEN),
        ] {
            if value.chars().count() > max {
                return Err(DomainError::InvalidArgument(format!(
                    "{field} must be at most {max} characters"
                )));
            }
        }
        let [name, email, phone, address] = fields.map(str::to_string);
        Ok(Self {
            name,
            email,
            phone,
            address,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Persistence(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

/// A cart line as read inside the checkout transaction, priced at that instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub cart_line_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl PricedLine {
    pub fn extension(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// Sum of `quantity * unit_price` over all lines; zero for an empty cart.
pub fn order_total(lines: &[PricedLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::from(0), |acc, line| acc + line.extension())
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub contact: CustomerContact,
    pub total_price: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}
