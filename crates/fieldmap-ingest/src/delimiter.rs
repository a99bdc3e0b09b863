//! Delimiter detection.

use serde::{Deserialize, Serialize};

/// Cell delimiters recognised in uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    /// Candidates in tie-break order.
    pub const ALL: [Delimiter; 3] = [Delimiter::Comma, Delimiter::Semicolon, Delimiter::Tab];

    pub fn as_char(&self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
        }
    }

    /// Picks the delimiter occurring most often in `line`.
    ///
    /// Ties (including a line with no candidate at all) go to comma.
    pub fn detect(line: &str) -> Self {
        let mut best = Self::Comma;
        let mut best_count = 0usize;
        for candidate in Self::ALL {
            let count = line.chars().filter(|&c| c == candidate.as_char()).count();
            if count > best_count {
                best = candidate;
                best_count = count;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_semicolon() {
        assert_eq!(Delimiter::detect("a;b;c"), Delimiter::Semicolon);
    }

    #[test]
    fn detects_tab() {
        assert_eq!(Delimiter::detect("a\tb\tc,d"), Delimiter::Tab);
    }

    #[test]
    fn ties_default_to_comma() {
        assert_eq!(Delimiter::detect("a,b;c"), Delimiter::Comma);
        assert_eq!(Delimiter::detect("single"), Delimiter::Comma);
    }
}
