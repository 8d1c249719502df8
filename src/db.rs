use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

use crate::config::DatabaseSettings;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Applies a server-side `statement_timeout` to every pooled connection so no
/// query (lock waits included) runs past the configured deadline.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout(Duration);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET statement_timeout = {}", self.0.as_millis()))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(settings: &DatabaseSettings) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(&settings.url);
    Pool::builder()
        .max_size(settings.pool_max_size)
        .connection_timeout(settings.timeout)
        .connection_customizer(Box::new(StatementTimeout(settings.timeout)))
        .build(manager)
}
