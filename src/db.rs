use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Builds the pool and opens its initial connections, failing if the
/// database cannot be reached within the connection timeout.
pub fn create_pool(database_url: &str) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
}

/// Whether a connection can be checked out right now.
pub fn is_reachable(pool: &DbPool) -> bool {
    pool.get_timeout(PING_TIMEOUT).is_ok()
}
