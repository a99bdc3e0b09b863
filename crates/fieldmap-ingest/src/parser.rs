//! Text-to-table parsing.

use crate::decode::decode_payload;
use crate::delimiter::Delimiter;
use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// Parses raw upload bytes into a [`RawTable`].
///
/// See [`parse_text`] for the parsing rules.
pub fn parse_payload(bytes: &[u8]) -> Result<RawTable> {
    let (text, encoding) = decode_payload(bytes);
    tracing::debug!(encoding = encoding.name(), bytes = bytes.len(), "decoded upload");
    parse_text(&text)
}

/// Parses upload text into a [`RawTable`].
///
/// - A leading byte-order mark is ignored.
/// - Blank lines are discarded; the first remaining line is the header row.
/// - The delimiter is detected on the header row (see [`Delimiter::detect`]).
/// - Cells are trimmed and lose one layer of surrounding quotes.
pub fn parse_text(text: &str) -> Result<RawTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Err(IngestError::EmptyInput);
    };
    let delimiter = Delimiter::detect(header_line);
    let headers = split_line(header_line, delimiter);
    let rows: Vec<Vec<String>> = lines.map(|line| split_line(line, delimiter)).collect();

    tracing::debug!(
        delimiter = ?delimiter,
        columns = headers.len(),
        rows = rows.len(),
        "parsed upload table"
    );

    Ok(RawTable {
        headers,
        rows,
        delimiter,
    })
}

/// Splits a line into cells, honouring double-quoted cells.
///
/// A delimiter inside `"..."` does not split, and `""` inside quotes is a
/// literal quote. Each cell is then passed through [`clean_cell`].
pub fn split_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    let separator = delimiter.as_char();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            c if c == separator && !in_quotes => {
                cells.push(clean_cell(&current));
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    cells.push(clean_cell(&current));
    cells
}

/// Trims a cell and strips one layer of matching single or double quotes.
pub fn clean_cell(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim().to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_simple() {
        assert_eq!(split_line("a,b,c", Delimiter::Comma), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_line_quoted_delimiter() {
        let result = split_line("\"Pérez, Ana\",b,c", Delimiter::Comma);
        assert_eq!(result, vec!["Pérez, Ana", "b", "c"]);
    }

    #[test]
    fn test_split_line_escaped_quotes() {
        let result = split_line("\"la \"\"Mayor\"\"\";b", Delimiter::Semicolon);
        assert_eq!(result, vec!["la \"Mayor\"", "b"]);
    }

    #[test]
    fn test_split_line_single_quotes_stripped() {
        let result = split_line("'Empresa' ; ' Sector '", Delimiter::Semicolon);
        assert_eq!(result, vec!["Empresa", "Sector"]);
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("  hello  "), "hello");
        assert_eq!(clean_cell("'x'"), "x");
        assert_eq!(clean_cell("\""), "\"");
        assert_eq!(clean_cell("it's"), "it's");
    }

    #[test]
    fn test_trailing_delimiter_keeps_empty_cell() {
        assert_eq!(split_line("a,b,", Delimiter::Comma), vec!["a", "b", ""]);
    }

    #[test]
    fn test_parse_text_skips_blank_lines() {
        let table = parse_text("\n  \nname,sector\r\n\r\nAcme,Retail\n\n").unwrap();
        assert_eq!(table.headers, vec!["name", "sector"]);
        assert_eq!(table.rows, vec![vec!["Acme", "Retail"]]);
    }

    #[test]
    fn test_parse_text_empty() {
        assert!(matches!(parse_text(""), Err(IngestError::EmptyInput)));
        assert!(matches!(
            parse_text("\u{feff}\n \n\t\n"),
            Err(IngestError::EmptyInput)
        ));
    }

    #[test]
    fn test_parse_text_header_only() {
        let table = parse_text("a;b;c").unwrap();
        assert_eq!(table.delimiter, Delimiter::Semicolon);
        assert_eq!(table.headers.len(), 3);
        assert!(table.rows.is_empty());
    }
}
