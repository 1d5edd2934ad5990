use invenscan_core::{ReceiptTable, COLUMNS};

/// Render as a pipe table: header, rule, then one line per row.
///
/// Feeding the output back through [`crate::TableExtractor`] yields the same
/// rows, provided no cell contains `|`.
pub fn render_table(table: &ReceiptTable) -> String {
    let mut out = String::new();
    push_line(&mut out, COLUMNS);
    push_line(&mut out, ["---"; 6]);
    for row in table {
        push_line(&mut out, row.cells());
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableExtractor;
    use invenscan_core::RecordValidator;

    fn table() -> ReceiptTable {
        [
            ["Milk", "2L Carton", "2", "pcs", "3.50", "7.00"],
            ["Bread", "Sourdough", "1", "loaf", "4.25", "4.25"],
            ["Apples", "Gala, loose", "1.2", "kg", "2.99", "3.59"],
        ]
        .iter()
        .map(|cells| RecordValidator::validate(cells).unwrap())
        .collect()
    }

    #[test]
    fn renders_header_rule_and_rows() {
        let text = render_table(&table());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "| product | description | quantity | unit | price | total |");
        assert_eq!(lines[1], "| --- | --- | --- | --- | --- | --- |");
        assert_eq!(lines[2], "| Milk | 2L Carton | 2 | pcs | 3.50 | 7.00 |");
    }

    #[test]
    fn render_then_parse_is_identity() {
        let original = table();
        assert_eq!(TableExtractor::extract(&render_table(&original)), original);
    }

    #[test]
    fn empty_table_renders_header_only() {
        let text = render_table(&ReceiptTable::default());
        assert_eq!(text.lines().count(), 2);
        assert!(TableExtractor::extract(&text).is_empty());
    }
}
