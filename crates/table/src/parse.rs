use invenscan_core::{RecordValidator, ReceiptTable, COLUMNS};
use serde::Serialize;

/// Parsed table plus what was thrown away on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableExtraction {
    pub table: ReceiptTable,
    /// Non-decoration lines that did not split into six cells.
    pub dropped_lines: usize,
    /// Whether the first six-cell row was a header and got removed.
    pub header_skipped: bool,
}

/// Pulls six-column rows out of a model's free-form pipe table.
///
/// Best effort: malformed lines are skipped, never fatal.
pub struct TableExtractor;

impl TableExtractor {
    pub fn extract(text: &str) -> ReceiptTable {
        Self::extract_with_stats(text).table
    }

    pub fn extract_with_stats(text: &str) -> TableExtraction {
        let mut dropped_lines = 0;
        let mut candidates: Vec<Vec<&str>> = Vec::new();

        for line in text.lines() {
            if is_decoration_line(line) {
                continue;
            }
            let cells = split_cells(line);
            if cells.len() == COLUMNS.len() {
                candidates.push(cells);
            } else {
                tracing::debug!("Dropping line with {} cells: {}", cells.len(), line.trim());
                dropped_lines += 1;
            }
        }

        let header_skipped = candidates.first().is_some_and(|first| is_header(first));
        let rows = if header_skipped { &candidates[1..] } else { &candidates[..] };

        // Split cells are already trimmed and non-empty, so nothing is rejected here.
        let (table, rejected) = RecordValidator::validate_all(rows);
        let dropped_lines = dropped_lines + rejected;

        if dropped_lines > 0 {
            tracing::warn!("Skipped {dropped_lines} malformed table lines");
        }

        TableExtraction { table, dropped_lines, header_skipped }
    }
}

/// A line made only of `|`, `-` and spaces (including a blank line).
pub fn is_decoration_line(line: &str) -> bool {
    line.trim().chars().all(|c| matches!(c, '|' | '-' | ' '))
}

/// Split on `|`, trim every cell and drop the empty ones.
pub fn split_cells(line: &str) -> Vec<&str> {
    line.trim()
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Case-insensitive match against the fixed column names, in order.
pub fn is_header<S: AsRef<str>>(cells: &[S]) -> bool {
    cells.len() == COLUMNS.len()
        && cells
            .iter()
            .zip(COLUMNS)
            .all(|(cell, name)| cell.as_ref().to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(table: &ReceiptTable) -> Vec<&str> {
        table.iter().map(|r| r.product.as_str()).collect()
    }

    const MARKDOWN: &str = "\
| Product | Description | Quantity | Unit | Price | Total |
|---|---|---|---|---|---|
| Milk | 2L Carton | 2 | pcs | 3.50 | 7.00 |
| Bread | Sourdough loaf | 1 | loaf | 4.25 | 4.25 |
";

    // ── Decoration ────────────────────────────────────────────────────────────

    #[test]
    fn decoration_lines() {
        assert!(is_decoration_line("|---|---|---|---|---|---|"));
        assert!(is_decoration_line("  | --- | --- |  "));
        assert!(is_decoration_line(""));
        assert!(is_decoration_line("   "));
        assert!(!is_decoration_line("|:---|---|"));
        assert!(!is_decoration_line("| a |"));
    }

    #[test]
    fn empty_and_all_decoration_input_gives_empty_table() {
        assert!(TableExtractor::extract("").is_empty());
        let out = TableExtractor::extract_with_stats("|---|---|\n\n   \n------");
        assert!(out.table.is_empty());
        assert_eq!(out.dropped_lines, 0);
        assert!(!out.header_skipped);
    }

    // ── Splitting ─────────────────────────────────────────────────────────────

    #[test]
    fn split_trims_and_drops_empty_cells() {
        assert_eq!(
            split_cells("| Milk | 2L Carton |2| pcs|3.50 |7.00|"),
            ["Milk", "2L Carton", "2", "pcs", "3.50", "7.00"]
        );
        assert_eq!(split_cells("a||b|  |c"), ["a", "b", "c"]);
    }

    #[test]
    fn only_six_cell_lines_survive() {
        let text = "\
Here is the table you asked for:
| Eggs | Free range | 12 | pcs | 0.30 | 3.60 |
| Butter | Salted | 1 | block | 2.10 |
| Jam | Strawberry | 1 | jar | 3.00 | 3.00 | extra |
| Tea | Green | 1 | box | 2.50 | 2.50 |";
        let out = TableExtractor::extract_with_stats(text);
        assert_eq!(products(&out.table), ["Eggs", "Tea"]);
        assert_eq!(out.dropped_lines, 3);
    }

    #[test]
    fn every_non_decoration_line_is_a_row_a_header_or_dropped() {
        let text = "\
| Product | Description | Quantity | Unit | Price | Total |
|---|---|---|---|---|---|
| Milk | 2L Carton | 2 | pcs | 3.50 | 7.00 |
Total due: 7.00
| Bread | Rye | 1 |

| Eggs | Free range | 12 | pcs | 0.30 | 3.60 |";
        let content_lines = text.lines().filter(|l| !is_decoration_line(l)).count();
        let out = TableExtractor::extract_with_stats(text);
        assert!(out.header_skipped);
        assert_eq!(out.dropped_lines, 2);
        assert_eq!(out.table.len() + out.dropped_lines + 1, content_lines);
    }

    #[test]
    fn rows_without_outer_pipes_are_accepted() {
        let t = TableExtractor::extract("Milk | 2L Carton | 2 | pcs | 3.50 | 7.00");
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0].description, "2L Carton");
    }

    // ── Header ────────────────────────────────────────────────────────────────

    #[test]
    fn markdown_table_drops_header_and_rule() {
        let out = TableExtractor::extract_with_stats(MARKDOWN);
        assert!(out.header_skipped);
        assert_eq!(products(&out.table), ["Milk", "Bread"]);
        let milk = &out.table.rows[0];
        assert_eq!(milk.cells(), ["Milk", "2L Carton", "2", "pcs", "3.50", "7.00"]);
    }

    #[test]
    fn header_first_then_data_then_rule() {
        let text = "product|description|quantity|unit|price|total\n\
                    Milk | 2L Carton | 2 | pcs | 3.50 | 7.00\n\
                    |---|---|---|---|---|---|";
        let t = TableExtractor::extract(text);
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0].cells(), ["Milk", "2L Carton", "2", "pcs", "3.50", "7.00"]);
    }

    #[test]
    fn header_after_data_is_kept_as_a_row() {
        let text = "Milk | 2L Carton | 2 | pcs | 3.50 | 7.00\n\
                    |---|---|---|---|---|---|\n\
                    product|description|quantity|unit|price|total";
        let out = TableExtractor::extract_with_stats(text);
        assert!(!out.header_skipped);
        assert_eq!(products(&out.table), ["Milk", "product"]);
    }

    #[test]
    fn repeated_header_mid_table_is_not_removed() {
        let text = format!("{MARKDOWN}| Product | Description | Quantity | Unit | Price | Total |\n| Jam | Fig | 1 | jar | 5.00 | 5.00 |");
        let t = TableExtractor::extract(&text);
        assert_eq!(products(&t), ["Milk", "Bread", "Product", "Jam"]);
    }

    #[test]
    fn header_check_skips_malformed_leading_lines() {
        // The header is the first *retained* row even if junk precedes it.
        let text = "Receipt items:\n| Product | Description | Quantity | Unit | Price | Total |\n| Tea | Green | 1 | box | 2.50 | 2.50 |";
        let out = TableExtractor::extract_with_stats(text);
        assert!(out.header_skipped);
        assert_eq!(products(&out.table), ["Tea"]);
        assert_eq!(out.dropped_lines, 1);
    }

    #[test]
    fn header_in_other_order_is_data() {
        let text = "| Total | Price | Unit | Quantity | Description | Product |\n| 7.00 | 3.50 | pcs | 2 | 2L Carton | Milk |";
        let t = TableExtractor::extract(text);
        assert_eq!(t.len(), 2);
        // Columns are positional; nothing is remapped.
        assert_eq!(t.rows[1].product, "7.00");
        assert_eq!(t.rows[1].total, "Milk");
    }

    #[test]
    fn is_header_is_case_insensitive() {
        assert!(is_header(&["PRODUCT", "Description", "quantity", "Unit", "PRICE", "total"]));
        assert!(!is_header(&["product", "description", "qty", "unit", "price", "total"]));
        assert!(!is_header(&["product", "description", "quantity", "unit", "price"]));
    }

    #[test]
    fn windows_line_endings() {
        let t = TableExtractor::extract("| Milk | 2L | 2 | pcs | 3.50 | 7.00 |\r\n| Tea | Green | 1 | box | 2.50 | 2.50 |\r\n");
        assert_eq!(products(&t), ["Milk", "Tea"]);
        assert_eq!(t.rows[0].total, "7.00");
    }
}
