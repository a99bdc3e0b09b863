use fieldmap_map::{FieldMapper, MappingProfile, MatcherConfig, SynonymDictionary};
use fieldmap_model::{Category, ConfidenceThresholds, MatchSource, OrganizationId, ProfileId};

fn default_mapper() -> FieldMapper {
    FieldMapper::new(
        SynonymDictionary::embedded().expect("embedded dictionary"),
        MatcherConfig::default(),
    )
}

fn headers(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|h| (*h).to_string()).collect()
}

#[test]
fn spanish_synonym_maps_with_synonym_confidence() {
    let mapping = default_mapper()
        .map_header("Nombre Empresa", Category::Entity)
        .expect("mapped");
    assert_eq!(mapping.canonical, "company_name");
    assert_eq!(mapping.detected, "Nombre Empresa");
    assert_eq!(mapping.source, MatchSource::Synonym);
    assert!((mapping.confidence_score - 0.95).abs() < 1e-9);
}

#[test]
fn truncated_header_maps_fuzzily() {
    let mapping = default_mapper()
        .map_header("Empres", Category::Entity)
        .expect("mapped");
    assert_eq!(mapping.canonical, "company_name");
    assert_eq!(mapping.source, MatchSource::Fuzzy);
    // One edit against the seven-character synonym "empresa", discounted.
    let expected = (6.0 / 7.0) * 0.9;
    assert!((mapping.confidence_score - expected).abs() < 1e-9);
    assert!(mapping.confidence_score >= 0.6);
}

#[test]
fn unrelated_header_stays_unmapped() {
    let mapper = default_mapper();
    for category in Category::ALL {
        assert!(mapper.map_header("xyz_unrelated_field", category).is_none());
    }
}

#[test]
fn exact_canonical_beats_earlier_synonym() {
    let dictionary = SynonymDictionary::from_csv_str(
        "category,canonical,required,synonyms_es,synonyms_en\n\
         entity,industry_code,false,,sector\n\
         entity,sector,true,giro,\n",
    )
    .expect("dictionary");
    let mapper = FieldMapper::new(dictionary, MatcherConfig::default());
    let mapping = mapper.map_header(" SECTOR ", Category::Entity).expect("mapped");
    assert_eq!(mapping.canonical, "sector");
    assert_eq!(mapping.source, MatchSource::Exact);
    assert_eq!(mapping.confidence_score, 1.0);
}

#[test]
fn fuzzy_ties_keep_dictionary_order() {
    let dictionary = SynonymDictionary::from_csv_str(
        "category,canonical,required,synonyms_es,synonyms_en\n\
         entity,abcd,false,,\n\
         entity,abce,false,,\n",
    )
    .expect("dictionary");
    let mapper = FieldMapper::new(dictionary, MatcherConfig::default());
    let mapping = mapper.map_header("abcx", Category::Entity).expect("mapped");
    assert_eq!(mapping.canonical, "abcd");
    assert!((mapping.confidence_score - 0.75).abs() < 1e-9);
}

#[test]
fn raised_low_threshold_rejects_weak_fuzzy_match() {
    let thresholds = ConfidenceThresholds {
        low: 0.8,
        ..ConfidenceThresholds::strict()
    };
    let mapper = FieldMapper::new(
        SynonymDictionary::embedded().expect("embedded dictionary"),
        MatcherConfig::default().with_thresholds(thresholds),
    );
    assert!(mapper.map_header("Empres", Category::Entity).is_none());
    assert!(mapper.map_header("Empresa", Category::Entity).is_some());
}

#[test]
fn resolve_reports_column_positions() {
    let mapper = default_mapper();
    let columns = headers(&["Empresa", "Notas internas", "Sector", "Accionista"]);
    let resolved = mapper.resolve(&columns, Category::Entity, None);

    let indices: Vec<usize> = resolved.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(resolved[0].mapping.canonical, "company_name");
    assert_eq!(resolved[1].mapping.canonical, "sector");
}

#[test]
fn profile_overrides_matching() {
    let mapper = default_mapper();
    let profile = MappingProfile::new(
        ProfileId::new("approved").expect("profile id"),
        OrganizationId::new("acme").expect("org id"),
    )
    .with_field("Nombre Comercial", Category::Entity, "company_name")
    .with_field("Sector", Category::Entity, "description")
    .with_field("Giro", Category::Entity, "not_a_field");

    let columns = headers(&["Nombre Comercial", "Sector", "Giro"]);
    let resolved = mapper.resolve(&columns, Category::Entity, Some(&profile));

    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].mapping.canonical, "company_name");
    assert_eq!(resolved[0].mapping.source, MatchSource::Profile);
    assert_eq!(resolved[0].mapping.confidence_score, 1.0);
    assert_eq!(resolved[1].mapping.canonical, "description");
    assert_eq!(resolved[1].mapping.source, MatchSource::Profile);
    // Unknown canonical in the profile falls back to dictionary matching.
    assert_eq!(resolved[2].mapping.canonical, "sector");
    assert_eq!(resolved[2].mapping.source, MatchSource::Synonym);
}

#[test]
fn rank_candidates_respects_limit() {
    let mapper = default_mapper();
    assert!(mapper.rank_candidates("Empresa", Category::Entity, 0).is_empty());
    let ranked = mapper.rank_candidates("Empresa", Category::Entity, 100);
    assert_eq!(
        ranked.len(),
        mapper.dictionary().entries_for(Category::Entity).count()
    );
    assert_eq!(ranked[0].source, MatchSource::Synonym);
}
