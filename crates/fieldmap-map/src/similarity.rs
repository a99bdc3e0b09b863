//! String similarity.

use rapidfuzz::distance::levenshtein;

/// Levenshtein similarity in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
///
/// Lengths count characters. Two empty strings are identical (1.0). No case
/// folding is done here; callers pass normalized keys.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / longest as f64
}
