//! Header normalization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalizes a raw header into a comparison key.
///
/// - Trims surrounding whitespace
/// - Lowercases
/// - Strips diacritics (`"Año"` becomes `"ano"`)
/// - Collapses whitespace runs into a single `_`
/// - Drops anything outside `[a-z0-9_]`
///
/// Total and idempotent; the key may be empty.
pub fn normalize_header(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_whitespace() {
            if !in_whitespace {
                key.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            key.push(ch);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_header() {
        assert_eq!(normalize_header("  Año de Fundación "), "ano_de_fundacion");
        assert_eq!(normalize_header("Nombre Empresa"), "nombre_empresa");
        assert_eq!(normalize_header("COMPAÑÍA"), "compania");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(normalize_header("tax \t  id"), "tax_id");
        assert_eq!(normalize_header("tax\u{a0}id"), "tax_id");
    }

    #[test]
    fn test_punctuation_removed() {
        assert_eq!(normalize_header("% Participación"), "_participacion");
        assert_eq!(normalize_header("e-mail (work)"), "email_work");
        assert_eq!(normalize_header("???"), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["Año de Fundación", "% x", "  ", "ÉLAN  Vital"] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once);
        }
    }
}
