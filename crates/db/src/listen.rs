use sqlx::postgres::PgListener;

use crate::{Db, DbError};

/// NOTIFY channel pinged by the trigger on the appointments table.
pub const APPOINTMENTS_CHANNEL: &str = "appointments_changed";

/// A listener already subscribed to the appointment change feed. Callers
/// loop on `recv()`; which row changed does not matter to them, every
/// notification means "re-fetch".
pub async fn appointment_listener(db: &Db) -> Result<PgListener, DbError> {
    let mut listener = PgListener::connect_with(&db.0).await?;
    listener.listen(APPOINTMENTS_CHANNEL).await?;
    Ok(listener)
}
