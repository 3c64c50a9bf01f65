//! Brand persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `brands` table.
//! Ids are allocated by the in-memory store, so inserts carry explicit
//! ids; the unique-code rule is enforced at the application layer and
//! backed by a unique constraint in SQL.

use sqlx::PgPool;

use crate::state::BrandRecord;

/// Insert a new brand record.
pub async fn insert(pool: &PgPool, record: &BrandRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO brands (id, code, name, is_active, created_by, modified_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id)
    .bind(&record.code)
    .bind(&record.name)
    .bind(record.is_active)
    .bind(&record.created_by)
    .bind(&record.modified_by)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update an existing brand record. Returns `false` if no row matched.
pub async fn update(pool: &PgPool, record: &BrandRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE brands SET code = $1, name = $2, is_active = $3, modified_by = $4, updated_at = $5
         WHERE id = $6",
    )
    .bind(&record.code)
    .bind(&record.name)
    .bind(record.is_active)
    .bind(&record.modified_by)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a brand by id. Returns `false` if no row matched.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM brands WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all brands from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<BrandRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BrandRow>(
        "SELECT id, code, name, is_active, created_by, modified_by, created_at, updated_at
         FROM brands ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BrandRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct BrandRow {
    id: i64,
    code: String,
    name: String,
    is_active: bool,
    created_by: Option<String>,
    modified_by: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BrandRow {
    fn into_record(self) -> BrandRecord {
        BrandRecord {
            id: self.id,
            code: self.code,
            name: self.name,
            is_active: self.is_active,
            created_by: self.created_by,
            modified_by: self.modified_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
