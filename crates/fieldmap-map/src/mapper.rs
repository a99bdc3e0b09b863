//! Header-to-field matching.
//!
//! Each header is resolved against the fields of one category in three
//! passes, stopping at the first that succeeds:
//!
//! 1. Exact: the normalized header equals a normalized canonical id.
//! 2. Synonym: the normalized header equals a normalized synonym.
//! 3. Fuzzy: the best Levenshtein similarity against canonical ids and
//!    (discounted) synonyms, accepted at or above the low threshold.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use fieldmap_model::{Category, ConfidenceThresholds, DictionaryEntry, FieldMapping, MatchSource};

use crate::dictionary::SynonymDictionary;
use crate::normalize::normalize_header;
use crate::profile::MappingProfile;
use crate::similarity::similarity;

/// Scoring knobs for the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub thresholds: ConfidenceThresholds,
    /// Confidence reported for an exact synonym hit (default: 0.95).
    pub synonym_confidence: f64,
    /// Multiplier applied to fuzzy similarity against a synonym (default: 0.9).
    pub synonym_fuzzy_discount: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            synonym_confidence: 0.95,
            synonym_fuzzy_discount: 0.9,
        }
    }
}

impl MatcherConfig {
    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// A dictionary field with its comparison keys precomputed.
#[derive(Debug, Clone)]
struct IndexedField {
    entry: DictionaryEntry,
    key: String,
    synonym_keys: Vec<String>,
}

impl IndexedField {
    fn new(entry: &DictionaryEntry) -> Self {
        let synonym_keys: Vec<String> = entry
            .synonyms
            .iter()
            .map(normalize_header)
            .filter(|key| !key.is_empty())
            .collect();
        Self {
            key: normalize_header(&entry.canonical),
            synonym_keys,
            entry: entry.clone(),
        }
    }

    fn mapping(&self, detected: &str, confidence_score: f64, source: MatchSource) -> FieldMapping {
        FieldMapping {
            canonical: self.entry.canonical.clone(),
            detected: detected.to_string(),
            confidence_score,
            source,
            required: self.entry.required,
            category: self.entry.category,
        }
    }
}

/// A mapped column of an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    /// Zero-based column position.
    pub index: usize,
    pub mapping: FieldMapping,
}

/// Maps raw headers onto the canonical fields of a [`SynonymDictionary`].
#[derive(Debug, Clone)]
pub struct FieldMapper {
    dictionary: SynonymDictionary,
    fields: Vec<IndexedField>,
    config: MatcherConfig,
}

impl FieldMapper {
    pub fn new(dictionary: SynonymDictionary, config: MatcherConfig) -> Self {
        let fields = dictionary.entries().iter().map(IndexedField::new).collect();
        Self {
            dictionary,
            fields,
            config,
        }
    }

    pub fn dictionary(&self) -> &SynonymDictionary {
        &self.dictionary
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn fields_for(&self, category: Category) -> impl Iterator<Item = &IndexedField> {
        self.fields
            .iter()
            .filter(move |field| field.entry.category == category)
    }

    /// Resolves one header within `category`, or `None` when nothing clears
    /// the low threshold.
    pub fn map_header(&self, header: &str, category: Category) -> Option<FieldMapping> {
        let key = normalize_header(header);
        if key.is_empty() {
            return None;
        }

        if let Some(field) = self.fields_for(category).find(|field| field.key == key) {
            return Some(field.mapping(header, 1.0, MatchSource::Exact));
        }

        if let Some(field) = self
            .fields_for(category)
            .find(|field| field.synonym_keys.iter().any(|syn| *syn == key))
        {
            return Some(field.mapping(
                header,
                self.config.synonym_confidence,
                MatchSource::Synonym,
            ));
        }

        let mut best: Option<(&IndexedField, f64)> = None;
        for field in self.fields_for(category) {
            let score = self.fuzzy_score(&key, field);
            // Strict comparison keeps the earliest field on ties.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((field, score));
            }
        }

        best.filter(|(_, score)| *score >= self.config.thresholds.low)
            .map(|(field, score)| field.mapping(header, score, MatchSource::Fuzzy))
    }

    fn fuzzy_score(&self, key: &str, field: &IndexedField) -> f64 {
        let discount = self.config.synonym_fuzzy_discount;
        field
            .synonym_keys
            .iter()
            .map(|syn| similarity(key, syn) * discount)
            .fold(similarity(key, &field.key), f64::max)
    }

    /// Scores `header` against every field of `category`, best first.
    ///
    /// Unlike [`Self::map_header`] nothing is filtered by threshold; this is
    /// meant for showing a reviewer the alternatives.
    pub fn rank_candidates(
        &self,
        header: &str,
        category: Category,
        limit: usize,
    ) -> Vec<FieldMapping> {
        let key = normalize_header(header);
        let mut candidates: Vec<FieldMapping> = self
            .fields_for(category)
            .map(|field| {
                if !key.is_empty() && field.key == key {
                    field.mapping(header, 1.0, MatchSource::Exact)
                } else if !key.is_empty() && field.synonym_keys.contains(&key) {
                    field.mapping(header, self.config.synonym_confidence, MatchSource::Synonym)
                } else {
                    field.mapping(header, self.fuzzy_score(&key, field), MatchSource::Fuzzy)
                }
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.source.cmp(&b.source))
        });
        candidates.truncate(limit);
        candidates
    }

    /// Resolves every header of an upload within `category`.
    ///
    /// A profile entry naming a canonical field of `category` wins over
    /// matching. Columns that resolve to nothing are omitted.
    pub fn resolve(
        &self,
        headers: &[String],
        category: Category,
        profile: Option<&MappingProfile>,
    ) -> Vec<ResolvedColumn> {
        let mut resolved = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            let mapping = profile
                .and_then(|profile| self.profile_mapping(profile, header, category))
                .or_else(|| self.map_header(header, category));
            if let Some(mapping) = mapping {
                tracing::trace!(
                    header = %header,
                    canonical = %mapping.canonical,
                    source = mapping.source.as_str(),
                    confidence = mapping.confidence_score,
                    "resolved header"
                );
                resolved.push(ResolvedColumn { index, mapping });
            }
        }
        resolved
    }

    fn profile_mapping(
        &self,
        profile: &MappingProfile,
        header: &str,
        category: Category,
    ) -> Option<FieldMapping> {
        let canonical = profile.lookup(header, category)?;
        let field = self
            .fields_for(category)
            .find(|field| field.entry.canonical == canonical)?;
        Some(field.mapping(header, 1.0, MatchSource::Profile))
    }
}
