use invenscan_core::{ReceiptRow, ReceiptTable};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;

pub type DbPool = Pool<Sqlite>;

/// A persisted line item with its surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub id: i64,
    pub row: ReceiptRow,
}

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    // One connection: every write for a run goes through the same handle.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // Values stay TEXT: they are model output, not trusted numbers.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoice_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product TEXT,
            description TEXT,
            quantity TEXT,
            unit TEXT,
            price TEXT,
            total TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append every row in table order inside one transaction. Returns the new
/// ids in the same order. Nothing is deduplicated.
pub async fn insert_receipt_rows(pool: &DbPool, table: &ReceiptTable) -> Result<Vec<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(table.len());

    for row in table {
        let result = sqlx::query(
            "INSERT INTO invoice_items (product, description, quantity, unit, price, total) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.product)
        .bind(&row.description)
        .bind(&row.quantity)
        .bind(&row.unit)
        .bind(&row.price)
        .bind(&row.total)
        .execute(&mut *tx)
        .await?;
        ids.push(result.last_insert_rowid());
    }

    tx.commit().await?;
    tracing::info!("Stored {} receipt rows", ids.len());
    Ok(ids)
}

pub async fn list_receipt_rows(pool: &DbPool) -> Result<Vec<StoredRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, Option<String>, Option<String>, Option<String>, Option<String>, Option<String>, Option<String>)>(
        "SELECT id, product, description, quantity, unit, price, total FROM invoice_items ORDER BY id"
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| StoredRow {
        id: r.0,
        row: ReceiptRow {
            product: r.1.unwrap_or_default(),
            description: r.2.unwrap_or_default(),
            quantity: r.3.unwrap_or_default(),
            unit: r.4.unwrap_or_default(),
            price: r.5.unwrap_or_default(),
            total: r.6.unwrap_or_default(),
        },
    }).collect())
}

pub async fn count_receipt_rows(pool: &DbPool) -> Result<i64, sqlx::Error> {
    let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM invoice_items")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
