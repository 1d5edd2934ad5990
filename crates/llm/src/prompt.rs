/// Instruction sent ahead of the receipt text. The column names match
/// `invenscan_core::COLUMNS`.
pub const TABLE_INSTRUCTION: &str =
    "Extract a table of items from this receipt. Include product, description, quantity, unit, price, and total.";

/// Build the table-extraction prompt around normalized OCR text.
pub fn build_table_prompt(receipt_text: &str) -> String {
    format!("\n{TABLE_INSTRUCTION}\n\nReceipt:\n{receipt_text}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use invenscan_core::COLUMNS;

    #[test]
    fn prompt_embeds_receipt_text_after_instruction() {
        let p = build_table_prompt("FRESH MART\nMilk 7.00");
        let instruction = p.find(TABLE_INSTRUCTION).unwrap();
        let receipt = p.find("Receipt:\nFRESH MART\nMilk 7.00").unwrap();
        assert!(instruction < receipt);
    }

    #[test]
    fn instruction_names_every_column() {
        for column in COLUMNS {
            assert!(TABLE_INSTRUCTION.contains(column), "missing {column}");
        }
    }
}
