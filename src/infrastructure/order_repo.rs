use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    order_total, CustomerContact, Order, OrderLine, OrderStatus, PricedLine,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{cart_items, order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

// ── Row → domain ─────────────────────────────────────────────────────────────

fn to_order(order: OrderRow, items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
    Ok(Order {
        id: order.id,
        user_id: order.user_id,
        contact: CustomerContact {
            name: order.customer_name,
            email: order.customer_email,
            phone: order.phone,
            address: order.address,
        },
        total_price: order.total_price,
        status: order.status.parse()?,
        created_at: order.created_at,
        lines: items
            .into_iter()
            .map(|l| OrderLine {
                id: l.id,
                order_id: l.order_id,
                product_id: l.product_id,
                product_name: l.product_name,
                quantity: l.quantity,
                unit_price: l.price,
            })
            .collect(),
    })
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, user_id: i32, contact: &CustomerContact) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.build_transaction()
            .read_committed()
            .run::<_, DomainError, _>(|conn| {
                // 1. Lock the user's cart rows. Concurrent edits of these
                //    lines wait for our commit; catalog rows stay unlocked.
                let line_ids: Vec<i32> = cart_items::table
                    .filter(cart_items::user_id.eq(user_id))
                    .select(cart_items::id)
                    .for_update()
                    .load(conn)?;

                // 2. Price exactly the locked lines at current catalog prices
                let snapshot: Vec<PricedLine> = cart_items::table
                    .inner_join(products::table)
                    .filter(cart_items::id.eq_any(&line_ids))
                    .order(cart_items::id.asc())
                    .select((
                        cart_items::id,
                        cart_items::product_id,
                        products::name,
                        cart_items::quantity,
                        products::price,
                    ))
                    .load::<(i32, i32, String, i32, BigDecimal)>(conn)?
                    .into_iter()
                    .map(
                        |(cart_line_id, product_id, product_name, quantity, unit_price)| {
                            PricedLine {
                                cart_line_id,
                                product_id,
                                product_name,
                                quantity,
                                unit_price,
                            }
                        },
                    )
                    .collect();

                // 3. Insert the order header
                let order = diesel::insert_into(orders::table)
                    .values(&NewOrderRow {
                        user_id,
                        customer_name: &contact.name,
                        customer_email: &contact.email,
                        phone: &contact.phone,
                        address: &contact.address,
                        total_price: order_total(&snapshot),
                        status: OrderStatus::Pending.as_str(),
                    })
                    .returning(OrderRow::as_returning())
                    .get_result(conn)?;

                // 4. Copy the snapshot into order lines
                let new_items: Vec<NewOrderItemRow> = snapshot
                    .iter()
                    .map(|l| NewOrderItemRow {
                        order_id: order.id,
                        product_id: l.product_id,
                        product_name: &l.product_name,
                        quantity: l.quantity,
                        price: &l.unit_price,
                    })
                    .collect();
                let items = if new_items.is_empty() {
                    Vec::new()
                } else {
                    diesel::insert_into(order_items::table)
                        .values(&new_items)
                        .returning(OrderItemRow::as_returning())
                        .get_results(conn)?
                };

                // 5. Empty the cart. Only the locked lines go, so a line added
                //    after the lock survives instead of vanishing.
                diesel::delete(
                    cart_items::table
                        .filter(cart_items::user_id.eq(user_id))
                        .filter(cart_items::id.eq_any(&line_ids)),
                )
                .execute(conn)?;

                to_order(order, items)
            })
    }

    fn list_for_user(&self, user_id: i32) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = orders::table
                .filter(orders::user_id.eq(user_id))
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .load(conn)?;

            let items = OrderItemRow::belonging_to(&rows)
                .select(OrderItemRow::as_select())
                .order(order_items::id.asc())
                .load(conn)?;

            items
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(items, order)| to_order(order, items))
                .collect()
        })
    }
}
