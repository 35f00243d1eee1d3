use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::core::{
    errors::{AppError, AppResult},
    types::SettingEntry,
};

pub const GEMINI_MODEL_KEY: &str = "gemini_model";

fn parse_timestamp(value: String) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|err| AppError::Database(format!("invalid timestamp {value}: {err}")))
}

fn map_setting(row: SqliteRow) -> AppResult<SettingEntry> {
    Ok(SettingEntry {
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        updated_at: parse_timestamp(row.try_get("updated_at")?)?,
    })
}

pub async fn get_setting(pool: &SqlitePool, key: &str) -> AppResult<Option<SettingEntry>> {
    let row = sqlx::query(
        r#"
        SELECT key, value, updated_at
        FROM settings
        WHERE key = ?1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    row.map(map_setting).transpose()
}

pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> AppResult<SettingEntry> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE
        SET value = excluded.value,
            updated_at = (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    get_setting(pool, key)
        .await?
        .ok_or_else(|| AppError::Database(format!("setting {key} vanished after write")))
}

pub async fn delete_setting(pool: &SqlitePool, key: &str) -> AppResult<bool> {
    let affected = sqlx::query("DELETE FROM settings WHERE key = ?1")
        .bind(key)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}
