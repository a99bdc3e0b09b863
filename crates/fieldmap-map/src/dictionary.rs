//! Synonym dictionary loading.
//!
//! The default dictionary is embedded at compile time with `include_str!()`.
//! An alternate CSV with the same columns can be supplied through
//! `FIELDMAP_DICTIONARY` or [`SynonymDictionary::from_path`].
//!
//! # Format
//!
//! ```text
//! category,canonical,required,synonyms_es,synonyms_en
//! entity,company_name,true,empresa|razón social,company|business name
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use fieldmap_model::{Category, DictionaryEntry, Synonyms};

use crate::error::{DictionaryError, Result};

/// Default dictionary CSV.
pub const EMBEDDED_DICTIONARY: &str = include_str!("../data/synonyms.csv");

/// Environment variable pointing at an alternate dictionary CSV.
pub const DICTIONARY_ENV_VAR: &str = "FIELDMAP_DICTIONARY";

/// Immutable set of canonical fields, partitioned by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymDictionary {
    entries: Vec<DictionaryEntry>,
}

impl SynonymDictionary {
    /// Builds a dictionary, rejecting empty or duplicate canonical ids.
    pub fn new(entries: Vec<DictionaryEntry>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for (idx, entry) in entries.iter().enumerate() {
            if entry.canonical.trim().is_empty() {
                return Err(DictionaryError::EmptyCanonical { row: idx + 1 });
            }
            if !seen.insert((entry.category, entry.canonical.as_str())) {
                return Err(DictionaryError::DuplicateCanonical {
                    canonical: entry.canonical.clone(),
                    category: entry.category.to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// The dictionary shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_csv_str(EMBEDDED_DICTIONARY)
    }

    /// The dictionary named by `FIELDMAP_DICTIONARY`, or the embedded one.
    pub fn load_default() -> Result<Self> {
        match std::env::var_os(DICTIONARY_ENV_VAR) {
            Some(path) => Self::from_path(&PathBuf::from(path)),
            None => Self::embedded(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            entries = dictionary.len(),
            "loaded synonym dictionary"
        );
        Ok(dictionary)
    }

    pub fn from_csv_str(contents: &str) -> Result<Self> {
        Self::from_reader(contents.as_bytes())
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_matches('\u{feff}').to_ascii_lowercase())
            .collect();

        let mut entries = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let row_number = idx + 1;
            let row: BTreeMap<&str, &str> = headers
                .iter()
                .map(String::as_str)
                .zip(record.iter())
                .collect();
            entries.push(parse_entry(row_number, &row)?);
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Entries of one category, in dictionary order.
    pub fn entries_for(&self, category: Category) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn get(&self, category: Category, canonical: &str) -> Option<&DictionaryEntry> {
        self.entries_for(category)
            .find(|entry| entry.canonical == canonical)
    }

    /// Canonical ids a record of `category` must carry.
    pub fn required_fields(&self, category: Category) -> Vec<&str> {
        self.entries_for(category)
            .filter(|entry| entry.required)
            .map(|entry| entry.canonical.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(row: usize, fields: &BTreeMap<&str, &str>) -> Result<DictionaryEntry> {
    let column = |name: &'static str| {
        fields
            .get(name)
            .copied()
            .ok_or(DictionaryError::MissingColumn { row, column: name })
    };

    let category = column("category")?
        .parse::<Category>()
        .map_err(|source| DictionaryError::Category { row, source })?;
    let canonical = column("canonical")?.to_string();
    if canonical.is_empty() {
        return Err(DictionaryError::EmptyCanonical { row });
    }
    let required = parse_flag(column("required")?).ok_or_else(|| {
        DictionaryError::InvalidRequired {
            row,
            value: fields.get("required").copied().unwrap_or_default().to_string(),
        }
    })?;
    let synonyms = Synonyms::new(
        split_synonyms(fields.get("synonyms_es").copied().unwrap_or_default()),
        split_synonyms(fields.get("synonyms_en").copied().unwrap_or_default()),
    );

    Ok(DictionaryEntry {
        canonical,
        synonyms,
        required,
        category,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "si" | "sí" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

fn split_synonyms(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
