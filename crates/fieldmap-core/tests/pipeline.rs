use std::sync::Arc;

use anyhow::anyhow;
use fieldmap_core::{INTERNAL_ERROR_MESSAGE, Pipeline, PipelineError, PipelineOptions};
use fieldmap_map::{InMemoryProfileStore, MappingProfile, MappingProfileStore, SynonymDictionary};
use fieldmap_model::{
    Category, ErrorCode, MatchSource, OrganizationId, ProfileId, UploadRequest, UploadResponse,
};
use proptest::prelude::*;

fn pipeline() -> Pipeline {
    Pipeline::new(
        SynonymDictionary::embedded().expect("embedded dictionary"),
        PipelineOptions::default(),
    )
}

fn upload(csv: &str) -> UploadRequest {
    UploadRequest::new("acme", csv.as_bytes().to_vec()).with_request_id("req-1")
}

struct FailingStore;

impl MappingProfileStore for FailingStore {
    fn latest(&self, _organization: &OrganizationId) -> anyhow::Result<Option<MappingProfile>> {
        Err(anyhow!("profile database unavailable"))
    }

    fn save(&self, _profile: &MappingProfile) -> anyhow::Result<()> {
        Err(anyhow!("profile database unavailable"))
    }
}

#[test]
fn missing_required_field_is_reported() {
    let csv = "Nombre Empresa,País,Año de Fundación\nAcme,México,1999\n";
    let err = pipeline().process(&upload(csv)).unwrap_err();
    match err {
        PipelineError::MissingRequiredFields { missing } => assert_eq!(missing, vec!["sector"]),
        other => panic!("unexpected error: {other:?}"),
    }

    let response = pipeline().handle(&upload(csv));
    assert_eq!(response.status(), 400);
    let UploadResponse::Failure(failure) = response else {
        panic!("expected failure");
    };
    assert_eq!(failure.code, ErrorCode::MissingRequiredFields);
    assert_eq!(failure.missing_fields, vec!["sector"]);
    assert_eq!(failure.request_id.as_deref(), Some("req-1"));
}

#[test]
fn unnamed_related_parties_are_dropped() {
    let mut csv = String::from("Empresa;Sector;Accionista;Porcentaje\n");
    for row in 0..10 {
        let name = if row == 3 || row == 7 {
            String::new()
        } else {
            format!("Socio {row}")
        };
        csv.push_str(&format!("Acme SA;Manufactura;{name};{}%\n", row + 1));
    }

    let result = pipeline().process(&upload(&csv)).expect("processed");
    assert_eq!(result.related_parties.len(), 8);
    assert_eq!(result.related_parties[0].name.as_deref(), Some("Socio 0"));
    assert_eq!(result.related_parties[0].ownership_pct, Some(1.0));
    assert_eq!(result.entity.company_name.as_deref(), Some("Acme SA"));
    assert_eq!(result.entity.sector.as_deref(), Some("Manufactura"));
    assert_eq!(result.stats.data_rows, 10);
    assert_eq!(
        result.mapped_fields["Accionista"].category,
        Category::RelatedParty
    );
    assert!((result.confidence_score - 0.95).abs() < 1e-9);
    assert!(!result.needs_review);
}

#[test]
fn weak_matches_need_review() {
    let csv = "Empres,Sectores,Comentario libre interno\nAcme,Retail,n/a\n";
    let result = pipeline().process(&upload(csv)).expect("processed");
    assert_eq!(result.mapped_fields["Empres"].source, MatchSource::Fuzzy);
    assert_eq!(result.mapped_fields["Sectores"].canonical, "sector");
    assert_eq!(result.unmapped_columns, vec!["Comentario libre interno"]);
    assert!(result.confidence_score < 0.8);
    assert!(result.needs_review);
}

#[test]
fn processing_is_idempotent() {
    let csv = "Razón Social,Giro,País,Socio,Participación\nAcme,Retail,MX,Ana,60\nAcme,Retail,MX,Luis,40\n";
    let pipeline = pipeline();
    let first = serde_json::to_string(&pipeline.handle(&upload(csv))).unwrap();
    let second = serde_json::to_string(&pipeline.handle(&upload(csv))).unwrap();
    assert_eq!(first, second);
}

#[test]
fn input_errors_map_to_codes() {
    let pipeline = pipeline();

    let no_file = UploadRequest::new("acme", Vec::new());
    assert_eq!(
        pipeline.process(&no_file).unwrap_err().code(),
        ErrorCode::MissingInput
    );

    let no_org = UploadRequest::new("   ", b"Empresa,Sector\nAcme,Retail\n".to_vec());
    assert_eq!(
        pipeline.process(&no_org).unwrap_err().code(),
        ErrorCode::MissingInput
    );

    let blank = upload(" \r\n\r\n \n");
    assert_eq!(
        pipeline.process(&blank).unwrap_err().code(),
        ErrorCode::EmptyInput
    );

    let headers_only = upload("Empresa,Sector\n");
    assert_eq!(
        pipeline.process(&headers_only).unwrap_err().code(),
        ErrorCode::InvalidRecord
    );

    let blank_sector = upload("Empresa,Sector\nAcme,\nOther,Retail\n");
    let err = pipeline.process(&blank_sector).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidRecord);
    assert!(err.to_string().contains("sector"));
}

#[test]
fn oversized_upload_rejected_before_parsing() {
    let options = PipelineOptions {
        max_file_size: 16,
        ..PipelineOptions::default()
    };
    let pipeline = Pipeline::new(SynonymDictionary::embedded().unwrap(), options);
    let response = pipeline.handle(&upload("Empresa,Sector\nAcme,Retail\n"));
    let UploadResponse::Failure(failure) = response else {
        panic!("expected failure");
    };
    assert_eq!(failure.code, ErrorCode::FileTooLarge);
}

#[test]
fn profile_mappings_take_precedence() {
    let store = Arc::new(InMemoryProfileStore::new());
    let profile = MappingProfile::new(
        ProfileId::new("approved-2024").unwrap(),
        OrganizationId::new("acme").unwrap(),
    )
    .with_field("Marca", Category::Entity, "company_name")
    .with_field("Rubro Principal", Category::Entity, "sector");
    store.save(&profile).unwrap();

    let csv = "Marca,Rubro Principal\nAcme,Retail\n";
    assert_eq!(
        pipeline().process(&upload(csv)).unwrap_err().code(),
        ErrorCode::MissingRequiredFields
    );

    let pipeline = pipeline().with_profile_store(store);
    let result = pipeline.process(&upload(csv)).expect("processed");
    assert_eq!(
        result.mapping_profile_used.as_ref().map(ProfileId::as_str),
        Some("approved-2024")
    );
    assert_eq!(result.mapped_fields["Marca"].source, MatchSource::Profile);
    assert_eq!(result.confidence_score, 1.0);
    assert_eq!(result.entity.sector.as_deref(), Some("Retail"));

    // Another organization does not see the profile.
    let other = UploadRequest::new("globex", csv.as_bytes().to_vec());
    assert!(pipeline.process(&other).is_err());
}

#[test]
fn profile_store_failure_degrades_to_dictionary() {
    let pipeline = pipeline().with_profile_store(Arc::new(FailingStore));
    let result = pipeline
        .process(&upload("Empresa,Sector\nAcme,Retail\n"))
        .expect("processed");
    assert!(result.mapping_profile_used.is_none());
    assert_eq!(result.mapped_fields.len(), 2);
}

#[test]
fn dictionary_without_related_fields_is_internal_error() {
    let dictionary = SynonymDictionary::from_csv_str(
        "category,canonical,required,synonyms_es,synonyms_en\n\
         entity,company_name,true,empresa,\n",
    )
    .unwrap();
    let pipeline = Pipeline::new(dictionary, PipelineOptions::default());
    let response = pipeline.handle(&upload("Empresa\nAcme\n"));
    assert_eq!(response.status(), 500);
    let json = serde_json::to_value(&response).unwrap();
    insta::assert_json_snapshot!(json, @r#"
    {
      "code": "INTERNAL_ERROR",
      "message": "an unexpected error occurred while processing the upload",
      "request_id": "req-1",
      "success": false
    }
    "#);
    assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
}

#[test]
fn stats_count_required_fields_across_categories() {
    let csv = "Empresa,Sector,Sitio Web\nAcme,Retail,acme.mx\n";
    let result = pipeline().process(&upload(csv)).expect("processed");
    assert_eq!(result.stats.total_columns, 3);
    assert_eq!(result.stats.mapped_columns, 3);
    assert_eq!(result.stats.required_fields_total, 3);
    assert_eq!(result.stats.required_fields_mapped, 2);
    assert!(result.related_parties.is_empty());
}

const HEADER_POOL: &[&str] = &[
    "Empresa",
    "Sector",
    "País",
    "Accionista",
    "Porcentaje",
    "RFC",
    "Empres",
    "xyz_unrelated_field",
    "Columna 7",
    "Notas",
    "Año de Fundación",
    "Empleados",
];

proptest! {
    #[test]
    fn every_header_is_mapped_or_unmapped(
        extras in prop::collection::vec(prop::sample::select(HEADER_POOL), 0..10),
        rows in 1usize..4,
    ) {
        let mut headers = vec!["Empresa", "Sector"];
        headers.extend(extras);
        let mut csv = headers.join(",");
        csv.push('\n');
        for _ in 0..rows {
            csv.push_str(&vec!["v"; headers.len()].join(","));
            csv.push('\n');
        }

        let result = pipeline().process(&upload(&csv)).expect("processed");
        prop_assert_eq!(
            result.mapped_fields.len() + result.unmapped_columns.len(),
            headers.len()
        );
        for mapping in result.mapped_fields.values() {
            prop_assert!(mapping.confidence_score >= 0.6);
        }
        prop_assert!(result.unmapped_columns.contains(&"xyz_unrelated_field".to_string())
            || !headers.contains(&"xyz_unrelated_field"));
    }
}
