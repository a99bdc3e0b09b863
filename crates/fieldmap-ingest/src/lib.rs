//! Upload ingestion.
//!
//! Turns raw upload bytes into a header row and data rows.
//!
//! # Features
//!
//! - **Decoding**: UTF-8/UTF-16 byte-order marks, Windows-1252 fallback
//! - **Delimiter Detection**: comma, semicolon or tab, picked from the header row
//! - **Cell Cleaning**: trimming, quote stripping, quoted delimiters
//! - **Size Ceiling**: uploads over the limit are rejected before parsing
//!
//! # Example
//!
//! ```ignore
//! use fieldmap_ingest::{MAX_UPLOAD_SIZE, check_payload_size, parse_payload};
//!
//! check_payload_size(bytes.len() as u64, MAX_UPLOAD_SIZE)?;
//! let table = parse_payload(&bytes)?;
//! println!("{} columns, {} rows", table.column_count(), table.row_count());
//! ```

mod decode;
mod delimiter;
mod error;
mod parser;
mod reader;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Parsing ===
pub use decode::decode_payload;
pub use delimiter::Delimiter;
pub use parser::{clean_cell, parse_payload, parse_text, split_line};
pub use table::RawTable;

// === Size Checks ===
pub use reader::{MAX_UPLOAD_SIZE, check_file_size_with_limit, check_payload_size, read_upload};
