//! Presentation adapter: pure view mapping from a record to renderable
//! cards, and back to the canonical plain-text report.

use serde::Serialize;

use crate::record::StrainRecord;
use crate::schema::FieldId;

/// A labelled group of values inside a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardField {
    pub label: String,
    pub values: Vec<String>,
}

impl CardField {
    fn new(label: &str, values: Vec<String>) -> Self {
        Self {
            label: label.to_string(),
            values,
        }
    }
}

/// One dashboard card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub fields: Vec<CardField>,
}

/// The four-card dashboard view of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub cards: Vec<Card>,
}

/// Build the dashboard view. Absent fields are shown as empty groups so
/// the UI can render a consistent card layout.
pub fn dashboard(record: &StrainRecord) -> Dashboard {
    let name_card = Card {
        title: "Name".into(),
        fields: vec![
            CardField::new("Strain Name", vec![record.name.clone()]),
            CardField::new("Alternative Names", record.alt_names.clone()),
            CardField::new("Nicknames", record.nicknames.clone()),
        ],
    };

    let attributes_card = Card {
        title: "Attributes".into(),
        fields: vec![
            CardField::new("Hybridization", scalar(&record.hybridization)),
            CardField::new("Top Flavors", record.flavors.clone()),
            CardField::new("Top Effects", record.effects.clone()),
            CardField::new(
                "Physical Characteristics",
                record.physical_characteristics.clone(),
            ),
        ],
    };

    let history_card = Card {
        title: "History".into(),
        fields: vec![
            CardField::new("Original Release Date", scalar(&record.release_date)),
            CardField::new("Lineage / Genetics", scalar(&record.lineage)),
            CardField::new("Trivia", record.trivia.clone()),
            CardField::new("Awards", record.awards.clone()),
            CardField::new("Similar Strains", record.similar_strains.clone()),
        ],
    };

    let mut insights_fields = vec![CardField::new(
        "Availability by State",
        record.availability.clone(),
    )];
    if let Some(rating) = record.rating.as_ref().filter(|r| r.is_present()) {
        let mut summary = Vec::new();
        if let Some(score) = rating.score {
            summary.push(format!("{score} / 5"));
        }
        if let Some(count) = &rating.review_count {
            summary.push(format!("{count} reviews"));
        }
        insights_fields.push(CardField::new("User Rating", summary));
        insights_fields.push(CardField::new("Common Comments", rating.comments.clone()));
    } else {
        insights_fields.push(CardField::new("User Rating", Vec::new()));
    }
    let insights_card = Card {
        title: "Insights".into(),
        fields: insights_fields,
    };

    Dashboard {
        cards: vec![name_card, attributes_card, history_card, insights_card],
    }
}

fn scalar(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

/// Regenerate the canonical plain-text report from a record. Used as the
/// chat-displayable `raw` text for cache hits; absent fields appear as
/// "Unknown" per the report convention.
pub fn record_to_text(record: &StrainRecord) -> String {
    let mut out = String::new();

    out.push_str("=== NAME ===\n");
    push_scalar(&mut out, FieldId::Name, &record.name);
    push_comma_list(&mut out, FieldId::AltNames, &record.alt_names);
    push_comma_list(&mut out, FieldId::Nicknames, &record.nicknames);

    out.push_str("\n=== ATTRIBUTES ===\n");
    push_scalar(&mut out, FieldId::Hybridization, &record.hybridization);
    push_bullets(&mut out, FieldId::Flavors, &record.flavors);
    push_bullets(&mut out, FieldId::Effects, &record.effects);
    push_bullets(
        &mut out,
        FieldId::PhysicalCharacteristics,
        &record.physical_characteristics,
    );

    out.push_str("\n=== HISTORY ===\n");
    push_scalar(&mut out, FieldId::ReleaseDate, &record.release_date);
    push_scalar(&mut out, FieldId::Lineage, &record.lineage);
    push_bullets(&mut out, FieldId::Trivia, &record.trivia);
    push_comma_list(&mut out, FieldId::Awards, &record.awards);
    push_bullets(&mut out, FieldId::SimilarStrains, &record.similar_strains);

    out.push_str("\n=== INSIGHTS ===\n");
    push_comma_list(&mut out, FieldId::Availability, &record.availability);
    out.push_str(FieldId::Rating.label());
    out.push_str(":\n");
    match record.rating.as_ref().filter(|r| r.is_present()) {
        Some(rating) => {
            let score = rating
                .score
                .map(|s| format!("{s} / 5"))
                .unwrap_or_else(|| "Unknown".to_string());
            let count = rating.review_count.as_deref().unwrap_or("0");
            out.push_str(&format!("- {score} ({count} reviews)\n"));
            for comment in &rating.comments {
                out.push_str(&format!("- \"{comment}\"\n"));
            }
        }
        None => out.push_str("- Unknown (0 reviews)\n"),
    }

    out
}

fn push_scalar(out: &mut String, field: FieldId, value: &str) {
    let value = if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    };
    out.push_str(&format!("{}: {}\n", field.label(), value));
}

fn push_comma_list(out: &mut String, field: FieldId, values: &[String]) {
    let value = if values.is_empty() {
        "Unknown".to_string()
    } else {
        values.join(", ")
    };
    out.push_str(&format!("{}: {}\n", field.label(), value));
}

fn push_bullets(out: &mut String, field: FieldId, values: &[String]) {
    out.push_str(&format!("{}:\n", field.label()));
    if values.is_empty() {
        out.push_str("- Unknown\n");
    } else {
        for value in values {
            out.push_str(&format!("- {value}\n"));
        }
    }
}
