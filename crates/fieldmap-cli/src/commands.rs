use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, info_span};

use fieldmap_cli::setup::{build_pipeline, load_dictionary, process_file};
use fieldmap_map::{FileProfileStore, MappingProfile, MappingProfileStore};
use fieldmap_model::{OrganizationId, ProfileId, UploadResponse};

use crate::cli::{
    DictionaryArgs, OutputFormatArg, ProcessArgs, ProfileListArgs, ProfileSaveArgs,
    ProfileShowArgs,
};
use crate::summary::{
    print_dictionary, print_failure, print_profile, print_profile_list, print_result,
};

/// Runs `process`; returns whether the upload succeeded.
pub fn run_process(args: &ProcessArgs) -> Result<bool> {
    let pipeline = build_pipeline(&args.pipeline.sources(args.profiles.clone()))?;
    let response = process_file(&pipeline, &args.file, &args.org, args.request_id.clone())?;

    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&response).context("serialize response")?;
            println!("{json}");
        }
        OutputFormatArg::Table => match &response {
            UploadResponse::Success(success) => print_result(&success.result, pipeline.mapper()),
            UploadResponse::Failure(failure) => print_failure(failure),
        },
    }
    Ok(response.is_success())
}

pub fn run_dictionary(args: &DictionaryArgs) -> Result<()> {
    let dictionary = load_dictionary(args.dictionary.as_deref())?;
    print_dictionary(&dictionary, args.category);
    Ok(())
}

/// Runs `profile save`; returns whether a profile was written.
pub fn run_profile_save(args: &ProfileSaveArgs) -> Result<bool> {
    let organization = OrganizationId::new(args.org.as_str())?;
    let profile_id = match &args.profile_id {
        Some(id) => ProfileId::new(id.as_str())?,
        None => ProfileId::new(Utc::now().format("%Y%m%dT%H%M%SZ").to_string())?,
    };
    let span = info_span!("profile_save", org = %organization, profile = %profile_id);
    let _guard = span.enter();

    let pipeline = build_pipeline(&args.pipeline.sources(Some(args.profiles.clone())))?;
    let response = process_file(&pipeline, &args.file, organization.as_str(), None)?;
    let result = match response {
        UploadResponse::Success(success) => success.result,
        UploadResponse::Failure(failure) => {
            print_failure(&failure);
            return Ok(false);
        }
    };

    let mut profile = MappingProfile::from_result(profile_id, organization, &result);
    if let Some(description) = &args.description {
        profile = profile.with_description(description.as_str());
    }
    let store = FileProfileStore::new(&args.profiles);
    let path = store.save_profile(&profile)?;
    info!(fields = profile.len(), "profile saved");
    println!("Saved profile {} ({} fields) to {}", profile.profile_id, profile.len(), path.display());
    Ok(true)
}

/// Runs `profile show`; returns whether a profile exists.
pub fn run_profile_show(args: &ProfileShowArgs) -> Result<bool> {
    let organization = OrganizationId::new(args.org.as_str())?;
    let store = FileProfileStore::new(&args.profiles);
    let Some(profile) = store.latest(&organization)? else {
        eprintln!("no profile saved for organization {organization}");
        return Ok(false);
    };
    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&profile).context("serialize profile")?;
            println!("{json}");
        }
        OutputFormatArg::Table => print_profile(&profile),
    }
    Ok(true)
}

/// Runs `profile list`; returns whether any profile exists.
pub fn run_profile_list(args: &ProfileListArgs) -> Result<bool> {
    let store = FileProfileStore::new(&args.profiles);
    let mut profiles = store.list()?;
    if let Some(org) = &args.org {
        let organization = OrganizationId::new(org.as_str())?;
        profiles.retain(|profile| profile.organization_id == organization);
    }
    if profiles.is_empty() {
        eprintln!("no profiles in {}", args.profiles.display());
        return Ok(false);
    }
    match args.format {
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&profiles).context("serialize profiles")?;
            println!("{json}");
        }
        OutputFormatArg::Table => print_profile_list(&profiles),
    }
    Ok(true)
}
