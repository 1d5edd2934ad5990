pub mod gemini;
pub mod model;
pub mod prompt;

pub use gemini::GeminiClient;
pub use model::{GenerativeModel, MockModel, ModelError};
pub use prompt::{build_table_prompt, TABLE_INSTRUCTION};
