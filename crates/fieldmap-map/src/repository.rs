//! File-system backed profile store.
//!
//! Each organization gets a subdirectory holding one pretty-printed JSON
//! file per profile: `{organization_id}/{profile_id}.json`, both ids
//! escaped. The latest profile of an organization is the one with the
//! newest `saved_at`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fieldmap_model::{OrganizationId, ProfileId};

use crate::profile::{MappingProfile, MappingProfileStore};

/// Directory of saved mapping profiles.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    base_dir: PathBuf,
}

/// Summary of one stored profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub organization_id: OrganizationId,
    pub profile_id: ProfileId,
    pub file_path: PathBuf,
    pub saved_at: chrono::DateTime<chrono::Utc>,
    pub field_count: usize,
}

impl FileProfileStore {
    /// Points a store at `base_dir`. Nothing is touched until the first
    /// read or write, so an unusable directory only fails those calls.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes a profile and returns the file it landed in.
    pub fn save_profile(&self, profile: &MappingProfile) -> Result<PathBuf> {
        let dir = self.organization_dir(&profile.organization_id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create profile store: {}", dir.display()))?;
        let path = dir.join(profile_filename(&profile.profile_id));
        let json = serde_json::to_string_pretty(profile)
            .with_context(|| format!("Failed to serialize profile {}", profile.profile_id))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write profile to {}", path.display()))?;
        tracing::info!(
            organization = %profile.organization_id,
            profile = %profile.profile_id,
            fields = profile.len(),
            path = %path.display(),
            "saved mapping profile"
        );
        Ok(path)
    }

    /// Loads one profile by id. Returns `None` if it does not exist.
    pub fn load(
        &self,
        organization: &OrganizationId,
        profile_id: &ProfileId,
    ) -> Result<Option<MappingProfile>> {
        let path = self
            .organization_dir(organization)
            .join(profile_filename(profile_id));
        if !path.exists() {
            return Ok(None);
        }
        read_profile(&path).map(Some)
    }

    /// Every profile of one organization, oldest first.
    pub fn load_organization(&self, organization: &OrganizationId) -> Result<Vec<MappingProfile>> {
        let mut profiles = Vec::new();
        for path in json_files(&self.organization_dir(organization))? {
            match read_profile(&path) {
                Ok(profile) if &profile.organization_id == organization => profiles.push(profile),
                Ok(profile) => {
                    tracing::warn!(
                        path = %path.display(),
                        stored = %profile.organization_id,
                        "skipping profile filed under another organization"
                    );
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "skipping unreadable profile");
                }
            }
        }
        profiles.sort_by(|a, b| {
            a.saved_at
                .cmp(&b.saved_at)
                .then_with(|| a.profile_id.cmp(&b.profile_id))
        });
        Ok(profiles)
    }

    /// Summaries of every readable profile, sorted by organization then id.
    pub fn list(&self) -> Result<Vec<ProfileMetadata>> {
        let mut metadata = Vec::new();
        for dir in subdirectories(&self.base_dir)? {
            for path in json_files(&dir)? {
                let Ok(profile) = read_profile(&path) else {
                    continue;
                };
                metadata.push(ProfileMetadata {
                    organization_id: profile.organization_id,
                    profile_id: profile.profile_id,
                    file_path: path,
                    saved_at: profile.saved_at,
                    field_count: profile.fields.len(),
                });
            }
        }
        metadata.sort_by(|a, b| {
            a.organization_id
                .cmp(&b.organization_id)
                .then_with(|| a.profile_id.cmp(&b.profile_id))
        });
        Ok(metadata)
    }

    fn organization_dir(&self, organization: &OrganizationId) -> PathBuf {
        self.base_dir.join(escape_id(organization.as_str()))
    }
}

impl MappingProfileStore for FileProfileStore {
    fn latest(&self, organization: &OrganizationId) -> Result<Option<MappingProfile>> {
        Ok(self.load_organization(organization)?.pop())
    }

    fn save(&self, profile: &MappingProfile) -> Result<()> {
        self.save_profile(profile).map(|_| ())
    }
}

fn read_profile(path: &Path) -> Result<MappingProfile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse profile from {}", path.display()))
}

/// Entries of `dir` matching `keep`; a missing directory is empty.
fn entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("Failed to read profile store: {}", dir.display()));
        }
    };
    let mut paths = Vec::new();
    for entry in read {
        let path = entry?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    entries(dir, |path| {
        path.is_file() && path.extension().is_some_and(|ext| ext == "json")
    })
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    entries(dir, Path::is_dir)
}

fn profile_filename(profile_id: &ProfileId) -> String {
    format!("{}.json", escape_id(profile_id.as_str()))
}

/// Makes an id safe for use as a path component.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_XX`
/// (uppercase hex), so distinct ids never share a name.
fn escape_id(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("_{byte:02X}"));
        }
    }
    escaped
}
