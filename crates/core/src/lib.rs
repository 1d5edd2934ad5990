pub mod config;
pub mod row;

pub use config::{Config, ConfigError, DatabaseConfig, ModelConfig, VisionConfig};
pub use row::{RecordValidator, ReceiptRow, ReceiptTable, ValidationError, COLUMNS};
