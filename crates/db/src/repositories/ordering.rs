//! Shared `display_order` maintenance for admin-sortable tables.

use clinica_core::ordered_list::contiguous_order;
use clinica_core::types::DbId;
use sqlx::PgPool;

/// Every id in `table`, in current display order.
pub(crate) async fn list_ids(pool: &PgPool, table: &'static str) -> Result<Vec<DbId>, sqlx::Error> {
    let query = format!("SELECT id FROM {table} ORDER BY display_order, id");
    sqlx::query_scalar::<_, DbId>(&query).fetch_all(pool).await
}

/// Rewrite `display_order` so each id gets its position in `ids`.
///
/// Runs in a single transaction; ids not present in `table` are ignored.
pub(crate) async fn apply_display_order(
    pool: &PgPool,
    table: &'static str,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    let query = format!("UPDATE {table} SET display_order = $2 WHERE id = $1");
    let mut tx = pool.begin().await?;
    for (id, position) in contiguous_order(ids) {
        sqlx::query(&query)
            .bind(id)
            .bind(position)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    tracing::debug!(table, count = ids.len(), "Display order rewritten");
    Ok(())
}
