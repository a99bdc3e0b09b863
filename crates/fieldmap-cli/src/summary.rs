use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmap_map::{FieldMapper, MappingProfile, ProfileMetadata, SynonymDictionary};
use fieldmap_model::{
    Category, ConfidenceLevel, ConfidenceThresholds, EntityRecord, ErrorResponse, FieldMapping,
    ProcessingResult, RelatedPartyRecord,
};

/// Suggestions shown per unmapped header.
const SUGGESTIONS: usize = 3;

pub fn print_result(result: &ProcessingResult, mapper: &FieldMapper) {
    let thresholds = &mapper.config().thresholds;
    let review = if result.needs_review {
        "needs review"
    } else {
        "ok"
    };
    println!(
        "Confidence: {:.3} ({review})",
        result.confidence_score
    );
    println!(
        "Columns: {} mapped, {} unmapped, {} data rows",
        result.stats.mapped_columns,
        result.unmapped_columns.len(),
        result.stats.data_rows
    );
    let levels = result.group_by_level(thresholds);
    let count = |level| levels.get(&level).map_or(0, Vec::len);
    println!(
        "Levels: {} high, {} medium, {} low",
        count(ConfidenceLevel::High),
        count(ConfidenceLevel::Medium),
        count(ConfidenceLevel::Low)
    );
    if let Some(profile) = &result.mapping_profile_used {
        println!("Profile: {profile}");
    }

    print_mappings(result, thresholds);
    print_unmapped(result, mapper);
    print_entity(&result.entity);
    print_related_parties(&result.related_parties);
}

fn print_mappings(result: &ProcessingResult, thresholds: &ConfidenceThresholds) {
    let mut mappings: Vec<(&String, &FieldMapping)> = result.mapped_fields.iter().collect();
    mappings.sort_by(|a, b| {
        b.1.confidence_score
            .total_cmp(&a.1.confidence_score)
            .then_with(|| a.0.cmp(b.0))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Field"),
        header_cell("Category"),
        header_cell("Source"),
        header_cell("Confidence"),
        header_cell("Level"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for (header, mapping) in mappings {
        let field = if mapping.required {
            Cell::new(format!("{} *", mapping.canonical)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&mapping.canonical)
        };
        table.add_row(vec![
            Cell::new(header),
            field,
            Cell::new(mapping.category),
            Cell::new(mapping.source.as_str()),
            Cell::new(format!("{:.3}", mapping.confidence_score)),
            level_cell(mapping.level(thresholds)),
        ]);
    }
    println!();
    println!("Mapped columns (* required):");
    println!("{table}");
}

fn print_unmapped(result: &ProcessingResult, mapper: &FieldMapper) {
    if result.unmapped_columns.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Header"), header_cell("Closest fields")]);
    apply_table_style(&mut table);
    for header in &result.unmapped_columns {
        let mut candidates: Vec<FieldMapping> = Category::ALL
            .into_iter()
            .flat_map(|category| mapper.rank_candidates(header, category, SUGGESTIONS))
            .collect();
        candidates.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));
        let suggestions: Vec<String> = candidates
            .iter()
            .take(SUGGESTIONS)
            .filter(|candidate| candidate.confidence_score > 0.0)
            .map(|candidate| {
                format!(
                    "{}.{} ({:.2})",
                    candidate.category, candidate.canonical, candidate.confidence_score
                )
            })
            .collect();
        let suggestion_cell = if suggestions.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(suggestions.join(", "))
        };
        table.add_row(vec![Cell::new(header).fg(Color::Yellow), suggestion_cell]);
    }
    println!();
    println!("Unmapped columns:");
    println!("{table}");
}

fn print_entity(entity: &EntityRecord) {
    let mut fields: Vec<(&str, String)> = Vec::new();
    push_text(&mut fields, "company_name", entity.company_name.as_ref());
    push_text(&mut fields, "tax_id", entity.tax_id.as_ref());
    push_text(&mut fields, "sector", entity.sector.as_ref());
    push_text(&mut fields, "founding_year", entity.founding_year.as_ref());
    push_text(&mut fields, "country", entity.country.as_ref());
    push_text(&mut fields, "employee_count", entity.employee_count.as_ref());
    push_text(&mut fields, "website", entity.website.as_ref());
    push_text(&mut fields, "description", entity.description.as_ref());
    for (key, value) in &entity.extra {
        fields.push((key.as_str(), value.clone()));
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (field, value) in fields {
        table.add_row(vec![Cell::new(field).fg(Color::Blue), Cell::new(value)]);
    }
    println!();
    println!("Entity:");
    println!("{table}");
}

fn print_related_parties(parties: &[RelatedPartyRecord]) {
    if parties.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Ownership %"),
        header_cell("Country"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for party in parties {
        table.add_row(vec![
            optional_cell(party.name.as_ref()),
            optional_cell(party.party_type.as_ref()),
            optional_cell(party.ownership_pct.as_ref()),
            optional_cell(party.country.as_ref()),
            optional_cell(party.notes.as_ref()),
        ]);
    }
    println!();
    println!("Related parties ({}):", parties.len());
    println!("{table}");
}

pub fn print_failure(error: &ErrorResponse) {
    eprintln!("error [{}]: {}", error.code, error.message);
    if !error.missing_fields.is_empty() {
        eprintln!("missing fields:");
        for field in &error.missing_fields {
            eprintln!("- {field}");
        }
    }
    if let Some(request_id) = &error.request_id {
        eprintln!("request id: {request_id}");
    }
}

pub fn print_dictionary(dictionary: &SynonymDictionary, category: Option<Category>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Spanish"),
        header_cell("English"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for entry in dictionary
        .entries()
        .iter()
        .filter(|entry| category.is_none_or(|c| entry.category == c))
    {
        let required = if entry.required {
            Cell::new("yes").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(entry.category),
            Cell::new(&entry.canonical).fg(Color::Blue),
            required,
            Cell::new(entry.synonyms.es.join(", ")),
            Cell::new(entry.synonyms.en.join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn print_profile(profile: &MappingProfile) {
    println!("Profile: {} ({})", profile.profile_id, profile.organization_id);
    println!("Saved: {}", profile.saved_at.to_rfc3339());
    if let Some(description) = &profile.description {
        println!("Description: {description}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header key"),
        header_cell("Category"),
        header_cell("Field"),
    ]);
    apply_table_style(&mut table);
    for (key, field) in &profile.fields {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(field.category),
            Cell::new(&field.canonical).fg(Color::Blue),
        ]);
    }
    println!("{table}");
}

pub fn print_profile_list(profiles: &[ProfileMetadata]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Organization"),
        header_cell("Profile"),
        header_cell("Saved"),
        header_cell("Fields"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for profile in profiles {
        table.add_row(vec![
            Cell::new(&profile.organization_id).fg(Color::Blue),
            Cell::new(&profile.profile_id),
            Cell::new(profile.saved_at.format("%Y-%m-%d %H:%M")),
            Cell::new(profile.field_count),
            dim_cell(profile.file_path.display()),
        ]);
    }
    println!("{table}");
}

fn push_text<'a, T: ToString>(fields: &mut Vec<(&'a str, String)>, name: &'a str, value: Option<&T>) {
    if let Some(value) = value {
        fields.push((name, value.to_string()));
    }
}

fn level_cell(level: Option<ConfidenceLevel>) -> Cell {
    match level {
        Some(ConfidenceLevel::High) => Cell::new("high").fg(Color::Green),
        Some(ConfidenceLevel::Medium) => Cell::new("medium").fg(Color::Yellow),
        Some(ConfidenceLevel::Low) => Cell::new("low")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn optional_cell<T: ToString>(value: Option<&T>) -> Cell {
    match value {
        Some(value) => Cell::new(value.to_string()),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
