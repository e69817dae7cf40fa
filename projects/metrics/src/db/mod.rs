pub mod metrics;
pub mod schema;
pub mod store;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the pool without opening a connection; the first checkout connects.
pub fn build_pool(database_url: &str) -> PgPool {
    Pool::builder().build_unchecked(ConnectionManager::<PgConnection>::new(database_url))
}
