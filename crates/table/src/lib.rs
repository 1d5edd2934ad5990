pub mod parse;
pub mod render;

pub use parse::{is_decoration_line, is_header, split_cells, TableExtraction, TableExtractor};
pub use render::render_table;
