pub mod auth_service;
pub mod cart_service;
pub mod notifications;
pub mod order_service;
