use bigdecimal::BigDecimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: BigDecimal,
    /// Category tag.
    pub product_type: String,
    pub image: String,
    pub description: String,
}
