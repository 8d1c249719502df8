use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::cart::{quantity_too_large, validate_quantity, CartLine, CartLineView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, products};

use super::models::{CartItemRow, NewCartItemRow, ProductRow};

const PRODUCT_FK: &str = "cart_items_product_id_fkey";
const USER_FK: &str = "cart_items_user_id_fkey";
const QUANTITY_RANGE: &str = "cart_items_quantity_range";

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn lines(&self, user_id: i32) -> Result<Vec<CartLineView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = cart_items::table
            .inner_join(products::table)
            .filter(cart_items::user_id.eq(user_id))
            .order(cart_items::id.asc())
            .select((CartItemRow::as_select(), ProductRow::as_select()))
            .load::<(CartItemRow, ProductRow)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(line, product)| CartLineView {
                line: line.into(),
                product: product.into(),
            })
            .collect())
    }

    fn find(&self, line_id: i32) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = cart_items::table
            .find(line_id)
            .select(CartItemRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(CartLine::from))
    }

    /// A single `INSERT .. ON CONFLICT DO UPDATE`, so concurrent adds of the
    /// same product never lose an increment. A sum past the line limit trips
    /// the `CHECK` constraint and leaves the line unchanged.
    fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        let mut conn = self.pool.get()?;

        diesel::insert_into(cart_items::table)
            .values(&NewCartItemRow {
                user_id,
                product_id,
                quantity,
            })
            .on_conflict((cart_items::user_id, cart_items::product_id))
            .do_update()
            .set(cart_items::quantity.eq(cart_items::quantity + excluded(cart_items::quantity)))
            .execute(&mut conn)
            .map_err(|e| {
                let constraint = match &e {
                    DieselError::DatabaseError(_, info) => info.constraint_name().map(str::to_owned),
                    _ => None,
                };
                match constraint.as_deref() {
                    Some(PRODUCT_FK) => DomainError::NotFound("Product"),
                    // The session outlived its user.
                    Some(USER_FK) => DomainError::Unauthenticated,
                    Some(QUANTITY_RANGE) => quantity_too_large(),
                    _ => e.into(),
                }
            })?;

        Ok(())
    }

    fn update(&self, line_id: i32, quantity: i32) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        let mut conn = self.pool.get()?;

        let updated = diesel::update(cart_items::table.find(line_id))
            .set(cart_items::quantity.eq(quantity))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::NotFound("Cart item"));
        }
        Ok(())
    }

    fn remove(&self, line_id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(cart_items::table.find(line_id)).execute(&mut conn)?;
        Ok(())
    }

    fn clear(&self, user_id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id)))
            .execute(&mut conn)?;
        Ok(())
    }
}
