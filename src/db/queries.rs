use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{AppError, Result};
use crate::models::Subscription;

fn now() -> i64 {
    Utc::now().timestamp()
}

const SUBSCRIPTION_COLS: &str = "id, customer_id, active, created_at, updated_at";

fn subscription_from_row(row: &Row) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        active: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Upsert the mirrored subscription state for a customer.
///
/// `active` defaults to true when the event carries no explicit flag
/// (checkout completion). Overwrites `customer_id` and `active` on
/// conflict; `created_at` is preserved.
pub fn save_subscription(
    conn: &Connection,
    subscription_id: &str,
    customer_id: &str,
    active: Option<bool>,
) -> Result<Subscription> {
    let active = active.unwrap_or(true);
    let now = now();

    conn.execute(
        "INSERT INTO subscriptions (id, customer_id, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(id) DO UPDATE SET
             customer_id = excluded.customer_id,
             active = excluded.active,
             updated_at = excluded.updated_at",
        params![subscription_id, customer_id, active, now],
    )?;

    get_subscription(conn, subscription_id)?.ok_or_else(|| {
        AppError::Internal(format!(
            "Subscription {} missing after upsert",
            subscription_id
        ))
    })
}

pub fn get_subscription(conn: &Connection, subscription_id: &str) -> Result<Option<Subscription>> {
    conn.query_row(
        &format!("SELECT {} FROM subscriptions WHERE id = ?1", SUBSCRIPTION_COLS),
        params![subscription_id],
        subscription_from_row,
    )
    .optional()
    .map_err(Into::into)
}

/// List subscriptions for a customer, most recently updated first.
pub fn list_subscriptions_by_customer(
    conn: &Connection,
    customer_id: &str,
) -> Result<Vec<Subscription>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM subscriptions WHERE customer_id = ?1 ORDER BY updated_at DESC",
        SUBSCRIPTION_COLS
    ))?;
    let rows = stmt
        .query_map(params![customer_id], subscription_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
