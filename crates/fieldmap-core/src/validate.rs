//! Required-field checks and confidence aggregation.

use std::collections::BTreeSet;

use fieldmap_map::ResolvedColumn;
use fieldmap_model::{EntityRecord, FieldMapping};

/// Required canonical fields that no column resolved to, in `required` order.
pub fn unresolved_required(required: &[&str], columns: &[ResolvedColumn]) -> Vec<String> {
    let resolved: BTreeSet<&str> = columns
        .iter()
        .map(|column| column.mapping.canonical.as_str())
        .collect();
    required
        .iter()
        .filter(|field| !resolved.contains(*field))
        .map(|field| (*field).to_string())
        .collect()
}

/// Required canonical fields the entity holds no value for.
pub fn unfilled_required(required: &[&str], entity: &EntityRecord) -> Vec<String> {
    required
        .iter()
        .filter(|field| !entity.has_field(field))
        .map(|field| (*field).to_string())
        .collect()
}

/// Arithmetic mean of the mapping scores; 0 when nothing was mapped.
pub fn aggregate_confidence<'a>(mappings: impl IntoIterator<Item = &'a FieldMapping>) -> f64 {
    let (sum, count) = mappings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), mapping| {
            (sum + mapping.confidence_score, count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
