//! Organization mapping profiles.
//!
//! A profile records header-to-field decisions a reviewer already approved
//! for one organization, so the next upload from that organization maps the
//! same headers without guessing.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldmap_model::{Category, OrganizationId, ProcessingResult, ProfileId};

use crate::normalize::normalize_header;

/// Target of one profile entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileField {
    pub category: Category,
    pub canonical: String,
}

/// Approved header mappings of one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingProfile {
    pub profile_id: ProfileId,
    pub organization_id: OrganizationId,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keyed by normalized header.
    #[serde(default)]
    pub fields: BTreeMap<String, ProfileField>,
}

impl MappingProfile {
    pub fn new(profile_id: ProfileId, organization_id: OrganizationId) -> Self {
        Self {
            profile_id,
            organization_id,
            saved_at: Utc::now(),
            description: None,
            fields: BTreeMap::new(),
        }
    }

    /// Captures the accepted mappings of a processed upload.
    pub fn from_result(
        profile_id: ProfileId,
        organization_id: OrganizationId,
        result: &ProcessingResult,
    ) -> Self {
        result.mapped_fields.values().fold(
            Self::new(profile_id, organization_id),
            |profile, mapping| {
                profile.with_field(&mapping.detected, mapping.category, &mapping.canonical)
            },
        )
    }

    pub fn with_field(mut self, header: &str, category: Category, canonical: &str) -> Self {
        let key = normalize_header(header);
        if !key.is_empty() {
            self.fields.insert(
                key,
                ProfileField {
                    category,
                    canonical: canonical.to_string(),
                },
            );
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_saved_at(mut self, saved_at: DateTime<Utc>) -> Self {
        self.saved_at = saved_at;
        self
    }

    /// Canonical field this profile assigns to `header` within `category`.
    pub fn lookup(&self, header: &str, category: Category) -> Option<&str> {
        self.fields
            .get(&normalize_header(header))
            .filter(|field| field.category == category)
            .map(|field| field.canonical.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Storage for organization mapping profiles.
///
/// Callers treat lookups as best effort: a failing store degrades to
/// dictionary matching rather than failing the upload.
pub trait MappingProfileStore: Send + Sync {
    /// Most recently saved profile of the organization, if any.
    fn latest(&self, organization: &OrganizationId) -> Result<Option<MappingProfile>>;

    fn save(&self, profile: &MappingProfile) -> Result<()>;
}

/// Process-local profile store.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<OrganizationId, Vec<MappingProfile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingProfileStore for InMemoryProfileStore {
    fn latest(&self, organization: &OrganizationId) -> Result<Option<MappingProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| anyhow!("profile store lock poisoned"))?;
        Ok(profiles
            .get(organization)
            .and_then(|saved| saved.iter().max_by_key(|p| p.saved_at))
            .cloned())
    }

    fn save(&self, profile: &MappingProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| anyhow!("profile store lock poisoned"))?;
        let saved = profiles
            .entry(profile.organization_id.clone())
            .or_default();
        saved.retain(|p| p.profile_id != profile.profile_id);
        saved.push(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn org() -> OrganizationId {
        OrganizationId::new("acme").unwrap()
    }

    #[test]
    fn lookup_normalizes_and_scopes() {
        let profile = MappingProfile::new(ProfileId::new("p1").unwrap(), org())
            .with_field("Nombre Comercial", Category::Entity, "company_name");
        assert_eq!(
            profile.lookup("  NOMBRE  comercial", Category::Entity),
            Some("company_name")
        );
        assert_eq!(
            profile.lookup("Nombre Comercial", Category::RelatedParty),
            None
        );
    }

    #[test]
    fn in_memory_latest_is_newest() {
        let store = InMemoryProfileStore::new();
        let older = MappingProfile::new(ProfileId::new("old").unwrap(), org())
            .with_saved_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let newer = MappingProfile::new(ProfileId::new("new").unwrap(), org())
            .with_saved_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        store.save(&newer).unwrap();
        store.save(&older).unwrap();

        let latest = store.latest(&org()).unwrap().unwrap();
        assert_eq!(latest.profile_id.as_str(), "new");
        assert!(
            store
                .latest(&OrganizationId::new("other").unwrap())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn saving_same_id_replaces() {
        let store = InMemoryProfileStore::new();
        let id = ProfileId::new("p1").unwrap();
        store.save(&MappingProfile::new(id.clone(), org())).unwrap();
        store
            .save(
                &MappingProfile::new(id, org()).with_field("Giro", Category::Entity, "sector"),
            )
            .unwrap();
        let latest = store.latest(&org()).unwrap().unwrap();
        assert_eq!(latest.len(), 1);
    }
}
