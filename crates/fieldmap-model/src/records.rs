//! Typed records extracted from an upload.
//!
//! Known canonical fields land in typed struct fields; canonical fields
//! introduced by an alternate dictionary are kept verbatim in `extra`.
//! Numeric fields whose cell fails to parse are left unset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The primary subject of an upload (one per request).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub sector: Option<String>,
    pub founding_year: Option<i32>,
    pub country: Option<String>,
    pub employee_count: Option<u32>,
    pub website: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl EntityRecord {
    /// Stores `value` under `canonical`, returning whether a value was stored.
    ///
    /// Blank values and unparseable numbers are ignored.
    pub fn set_field(&mut self, canonical: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        match canonical {
            "company_name" => set_text(&mut self.company_name, value),
            "tax_id" => set_text(&mut self.tax_id, value),
            "sector" => set_text(&mut self.sector, value),
            "founding_year" => set_parsed(&mut self.founding_year, parse_integer(value)),
            "country" => set_text(&mut self.country, value),
            "employee_count" => set_parsed(&mut self.employee_count, parse_integer(value)),
            "website" => set_text(&mut self.website, value),
            "description" => set_text(&mut self.description, value),
            other => {
                self.extra.insert(other.to_string(), value.to_string());
                true
            }
        }
    }

    /// Whether a value is present for `canonical`.
    pub fn has_field(&self, canonical: &str) -> bool {
        match canonical {
            "company_name" => self.company_name.is_some(),
            "tax_id" => self.tax_id.is_some(),
            "sector" => self.sector.is_some(),
            "founding_year" => self.founding_year.is_some(),
            "country" => self.country.is_some(),
            "employee_count" => self.employee_count.is_some(),
            "website" => self.website.is_some(),
            "description" => self.description.is_some(),
            other => self.extra.contains_key(other),
        }
    }
}

/// A party associated with the entity (one per data row).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedPartyRecord {
    pub name: Option<String>,
    pub party_type: Option<String>,
    /// Ownership in percent units as written in the source (`"25%"` is `25.0`).
    pub ownership_pct: Option<f64>,
    pub country: Option<String>,
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl RelatedPartyRecord {
    /// Stores `value` under `canonical`, returning whether a value was stored.
    pub fn set_field(&mut self, canonical: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        match canonical {
            "shareholder_name" => set_text(&mut self.name, value),
            "shareholder_type" => set_text(&mut self.party_type, value),
            "ownership_pct" => set_parsed(&mut self.ownership_pct, parse_percentage(value)),
            "country" => set_text(&mut self.country, value),
            "notes" => set_text(&mut self.notes, value),
            other => {
                self.extra.insert(other.to_string(), value.to_string());
                true
            }
        }
    }

    pub fn has_field(&self, canonical: &str) -> bool {
        match canonical {
            "shareholder_name" => self.name.is_some(),
            "shareholder_type" => self.party_type.is_some(),
            "ownership_pct" => self.ownership_pct.is_some(),
            "country" => self.country.is_some(),
            "notes" => self.notes.is_some(),
            other => self.extra.contains_key(other),
        }
    }

    /// Whether the record carries a non-empty name.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

fn set_text(slot: &mut Option<String>, value: &str) -> bool {
    *slot = Some(value.to_string());
    true
}

fn set_parsed<T>(slot: &mut Option<T>, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

/// Parses a whole number, tolerating surrounding whitespace.
pub fn parse_integer<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.trim().parse::<T>().ok()
}

/// Parses a percentage such as `25`, `25%`, `12,5 %` or `0.4`.
pub fn parse_percentage(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let parsed: f64 = number.replace(',', ".").parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_numeric_fields_are_optional() {
        let mut record = EntityRecord::default();
        assert!(record.set_field("founding_year", " 1998 "));
        assert!(!record.set_field("employee_count", "about fifty"));
        assert_eq!(record.founding_year, Some(1998));
        assert_eq!(record.employee_count, None);
        assert!(!record.has_field("employee_count"));
    }

    #[test]
    fn blank_values_are_not_stored() {
        let mut record = EntityRecord::default();
        assert!(!record.set_field("company_name", "   "));
        assert!(!record.has_field("company_name"));
    }

    #[test]
    fn unknown_canonicals_go_to_extra() {
        let mut record = RelatedPartyRecord::default();
        assert!(record.set_field("board_seat", "yes"));
        assert_eq!(record.extra.get("board_seat").map(String::as_str), Some("yes"));
        assert!(record.has_field("board_seat"));
    }

    #[test]
    fn percentages_accept_suffix_and_decimal_comma() {
        assert_eq!(parse_percentage("25%"), Some(25.0));
        assert_eq!(parse_percentage("12,5 %"), Some(12.5));
        assert_eq!(parse_percentage("0.4"), Some(0.4));
        assert_eq!(parse_percentage("n/a"), None);
        assert_eq!(parse_percentage("inf"), None);
    }

    #[test]
    fn related_party_name_check() {
        let mut record = RelatedPartyRecord::default();
        assert!(!record.has_name());
        record.set_field("shareholder_name", "Ana Pérez");
        assert!(record.has_name());
    }
}
