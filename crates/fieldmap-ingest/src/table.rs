use serde::{Deserialize, Serialize};

use crate::delimiter::Delimiter;

/// A parsed upload: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Header cells, trimmed and unquoted, in column order.
    pub headers: Vec<String>,
    /// Data rows; rows may be shorter or longer than the header row.
    pub rows: Vec<Vec<String>>,
    pub delimiter: Delimiter,
}

impl RawTable {
    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (`row`, `column`), empty when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}
