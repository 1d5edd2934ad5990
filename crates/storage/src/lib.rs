pub mod db;

pub use db::{count_receipt_rows, create_db, insert_receipt_rows, list_receipt_rows, DbPool, StoredRow};
