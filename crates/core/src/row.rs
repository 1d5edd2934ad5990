use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Authoritative column order for every stored receipt line.
pub const COLUMNS: [&str; 6] = ["product", "description", "quantity", "unit", "price", "total"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Expected {expected} cells, found {found}")]
    WrongCellCount { expected: usize, found: usize },
    #[error("Empty value in column '{column}'")]
    EmptyCell { column: &'static str },
}

/// One receipt line item. Every field is kept as text: the values come from
/// OCR and a language model and are not trusted to be numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRow {
    pub product: String,
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub price: String,
    pub total: String,
}

impl ReceiptRow {
    /// Cells in `COLUMNS` order.
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.product,
            &self.description,
            &self.quantity,
            &self.unit,
            &self.price,
            &self.total,
        ]
    }
}

impl fmt::Display for ReceiptRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cells().join(" | "))
    }
}

/// Ordered line items of one receipt. Order matches the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptTable {
    pub rows: Vec<ReceiptRow>,
}

impl ReceiptTable {
    pub fn new(rows: Vec<ReceiptRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReceiptRow> {
        self.rows.iter()
    }
}

impl IntoIterator for ReceiptTable {
    type Item = ReceiptRow;
    type IntoIter = std::vec::IntoIter<ReceiptRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReceiptTable {
    type Item = &'a ReceiptRow;
    type IntoIter = std::slice::Iter<'a, ReceiptRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<ReceiptRow> for ReceiptTable {
    fn from_iter<I: IntoIterator<Item = ReceiptRow>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

/// Maps raw cell lists onto the fixed six-column schema.
///
/// Cells are assigned positionally. A header row is never used to remap
/// columns, only to decide whether the first row is data.
pub struct RecordValidator;

impl RecordValidator {
    pub fn validate<S: AsRef<str>>(cells: &[S]) -> Result<ReceiptRow, ValidationError> {
        if cells.len() != COLUMNS.len() {
            return Err(ValidationError::WrongCellCount {
                expected: COLUMNS.len(),
                found: cells.len(),
            });
        }

        let mut values = cells.iter().map(|c| c.as_ref().trim().to_string());
        let mut next = |column: &'static str| -> Result<String, ValidationError> {
            match values.next() {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(ValidationError::EmptyCell { column }),
            }
        };

        Ok(ReceiptRow {
            product: next(COLUMNS[0])?,
            description: next(COLUMNS[1])?,
            quantity: next(COLUMNS[2])?,
            unit: next(COLUMNS[3])?,
            price: next(COLUMNS[4])?,
            total: next(COLUMNS[5])?,
        })
    }

    /// Validate every candidate, keeping the valid rows in order.
    /// Returns the table and the number of rejected candidates.
    pub fn validate_all<S: AsRef<str>>(candidates: &[Vec<S>]) -> (ReceiptTable, usize) {
        let mut rejected = 0;
        let table = candidates
            .iter()
            .filter_map(|cells| match Self::validate(cells) {
                Ok(row) => Some(row),
                Err(_) => {
                    rejected += 1;
                    None
                }
            })
            .collect();
        (table, rejected)
    }
}
