//! Record extraction.
//!
//! Cells are written into records by the canonical id their column resolved
//! to. When several columns resolve to the same field, the first column with
//! a usable value wins.

use fieldmap_ingest::RawTable;
use fieldmap_map::ResolvedColumn;
use fieldmap_model::{EntityRecord, RelatedPartyRecord};

/// Builds the entity from the first data row.
///
/// Returns an empty record when the table has no data rows.
pub fn extract_entity(table: &RawTable, columns: &[ResolvedColumn]) -> EntityRecord {
    let mut record = EntityRecord::default();
    if table.rows.is_empty() {
        return record;
    }
    for column in columns {
        let canonical = column.mapping.canonical.as_str();
        if !record.has_field(canonical) {
            record.set_field(canonical, table.cell(0, column.index));
        }
    }
    record
}

/// Builds one related party per data row, dropping rows without a name.
pub fn extract_related_parties(
    table: &RawTable,
    columns: &[ResolvedColumn],
) -> Vec<RelatedPartyRecord> {
    let mut parties = Vec::new();
    let mut dropped = 0usize;
    for row in 0..table.row_count() {
        let mut record = RelatedPartyRecord::default();
        for column in columns {
            let canonical = column.mapping.canonical.as_str();
            if !record.has_field(canonical) {
                record.set_field(canonical, table.cell(row, column.index));
            }
        }
        if record.has_name() {
            parties.push(record);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, kept = parties.len(), "dropped unnamed related-party rows");
    }
    parties
}

#[cfg(test)]
mod tests {
    use fieldmap_ingest::parse_text;
    use fieldmap_model::{Category, FieldMapping, MatchSource};

    use super::*;

    fn column(index: usize, canonical: &str, category: Category) -> ResolvedColumn {
        ResolvedColumn {
            index,
            mapping: FieldMapping {
                canonical: canonical.to_string(),
                detected: canonical.to_string(),
                confidence_score: 1.0,
                source: MatchSource::Exact,
                required: false,
                category,
            },
        }
    }

    #[test]
    fn entity_reads_first_row_only() {
        let table = parse_text("Empresa,Año\nAcme, 1999 \nOther,2001\n").unwrap();
        let columns = [
            column(0, "company_name", Category::Entity),
            column(1, "founding_year", Category::Entity),
        ];
        let entity = extract_entity(&table, &columns);
        assert_eq!(entity.company_name.as_deref(), Some("Acme"));
        assert_eq!(entity.founding_year, Some(1999));
    }

    #[test]
    fn unparseable_number_is_unset() {
        let table = parse_text("Empresa,Año\nAcme,circa 1990\n").unwrap();
        let columns = [
            column(0, "company_name", Category::Entity),
            column(1, "founding_year", Category::Entity),
        ];
        let entity = extract_entity(&table, &columns);
        assert_eq!(entity.founding_year, None);
        assert!(entity.company_name.is_some());
    }

    #[test]
    fn first_non_empty_duplicate_wins() {
        let table = parse_text("Empresa,Razón Social,Compañía\n,Acme SA,Acme Corp\n").unwrap();
        let columns = [
            column(0, "company_name", Category::Entity),
            column(1, "company_name", Category::Entity),
            column(2, "company_name", Category::Entity),
        ];
        let entity = extract_entity(&table, &columns);
        assert_eq!(entity.company_name.as_deref(), Some("Acme SA"));
    }

    #[test]
    fn unnamed_parties_dropped() {
        let table = parse_text("Socio;Porcentaje\nAna;40%\n;10\nLuis;12,5\n").unwrap();
        let columns = [
            column(0, "shareholder_name", Category::RelatedParty),
            column(1, "ownership_pct", Category::RelatedParty),
        ];
        let parties = extract_related_parties(&table, &columns);
        assert_eq!(parties.len(), 2);
        assert_eq!(parties[0].ownership_pct, Some(40.0));
        assert_eq!(parties[1].ownership_pct, Some(12.5));
    }

    #[test]
    fn unknown_canonical_lands_in_extra() {
        let table = parse_text("Empresa,LEI\nAcme,5493001KJTIIGC8Y1R12\n").unwrap();
        let columns = [
            column(0, "company_name", Category::Entity),
            column(1, "lei", Category::Entity),
        ];
        let entity = extract_entity(&table, &columns);
        assert_eq!(
            entity.extra.get("lei").map(String::as_str),
            Some("5493001KJTIIGC8Y1R12")
        );
    }
}
