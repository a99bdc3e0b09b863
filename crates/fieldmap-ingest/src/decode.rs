//! Payload decoding.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Decodes raw upload bytes into text.
///
/// A UTF-8 or UTF-16 byte-order mark selects that encoding and is removed.
/// Without a BOM, valid UTF-8 is taken as is and anything else is read as
/// Windows-1252, the usual encoding of spreadsheet exports on Spanish-locale
/// systems. Never fails.
pub fn decode_payload(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), UTF_8),
        Err(_) => {
            tracing::debug!("payload is not valid UTF-8, decoding as windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text.into_owned(), WINDOWS_1252)
        }
    }
}
