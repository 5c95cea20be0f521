//! Declarative field schema for the strain report format.
//!
//! One table of descriptors drives the generic extractor, the merger's
//! field walk, and the spreadsheet column contract. Prompt wording can
//! drift (label suffixes, section renames) without touching code: only
//! the stable leading label text is matched.

use serde::{Deserialize, Serialize};

/// Identifier for every field of a [`StrainRecord`](crate::StrainRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Name,
    AltNames,
    Nicknames,
    Hybridization,
    Flavors,
    Effects,
    PhysicalCharacteristics,
    ReleaseDate,
    Lineage,
    Trivia,
    Awards,
    SimilarStrains,
    Availability,
    Rating,
}

impl FieldId {
    /// All fields in report order.
    pub const ALL: [FieldId; 14] = [
        FieldId::Name,
        FieldId::AltNames,
        FieldId::Nicknames,
        FieldId::Hybridization,
        FieldId::Flavors,
        FieldId::Effects,
        FieldId::PhysicalCharacteristics,
        FieldId::ReleaseDate,
        FieldId::Lineage,
        FieldId::Trivia,
        FieldId::Awards,
        FieldId::SimilarStrains,
        FieldId::Availability,
        FieldId::Rating,
    ];

    /// The descriptor for this field.
    pub fn spec(self) -> &'static FieldSpec {
        STRAIN_SCHEMA
            .iter()
            .find(|s| s.id == self)
            .expect("every FieldId has a schema entry")
    }

    /// The canonical report label (also the prompt/backfill label).
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// The spreadsheet column header for this field.
    pub fn column(self) -> &'static str {
        self.spec().column
    }
}

/// How a field's value is laid out in the report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single line of text after the label.
    Scalar,
    /// Hyphen/bullet lines following the label, capped at `max` if set.
    List { max: Option<usize> },
    /// Comma-separated values on the label line (bullets tolerated).
    CommaList { max: Option<usize> },
    /// Score line followed by quoted comment bullets.
    Rating,
}

/// Descriptor consumed by the generic extraction routine.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: FieldId,
    /// Section the field is expected in (lowercase). When the section is
    /// missing from a response the whole text is scanned instead.
    pub section: &'static str,
    /// Canonical label as it appears in the report contract.
    pub label: &'static str,
    /// Stable leading label texts, tried in order. Suffixes like
    /// "(Top 3)" or "by State" are never required for a match.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    /// Spreadsheet column header.
    pub column: &'static str,
}

/// The 14-field, four-section strain report schema.
pub const STRAIN_SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        id: FieldId::Name,
        section: "name",
        label: "Strain Name",
        aliases: &["Strain Name", "Name"],
        kind: FieldKind::Scalar,
        column: "Strain Name",
    },
    FieldSpec {
        id: FieldId::AltNames,
        section: "name",
        label: "Alt Name(s)",
        aliases: &["Alt Name", "Alternative Name"],
        kind: FieldKind::CommaList { max: None },
        column: "Alt Name(s)",
    },
    FieldSpec {
        id: FieldId::Nicknames,
        section: "name",
        label: "Nickname(s)",
        aliases: &["Nickname"],
        kind: FieldKind::CommaList { max: None },
        column: "Nickname(s)",
    },
    FieldSpec {
        id: FieldId::Hybridization,
        section: "attributes",
        label: "Hybridization",
        aliases: &["Hybridization"],
        kind: FieldKind::Scalar,
        column: "Hybridization",
    },
    FieldSpec {
        id: FieldId::Flavors,
        section: "attributes",
        label: "Reported Flavors (Top 3)",
        aliases: &["Reported Flavors", "Flavors"],
        kind: FieldKind::List { max: Some(3) },
        column: "Reported Flavors",
    },
    FieldSpec {
        id: FieldId::Effects,
        section: "attributes",
        label: "Reported Effects (Top 3)",
        aliases: &["Reported Effects", "Effects"],
        kind: FieldKind::List { max: Some(3) },
        column: "Reported Effects",
    },
    FieldSpec {
        id: FieldId::PhysicalCharacteristics,
        section: "attributes",
        label: "Physical Characteristics (Color, Bud Structure, Trichomes)",
        aliases: &["Physical Characteristics"],
        kind: FieldKind::List { max: None },
        column: "Physical Characteristics",
    },
    FieldSpec {
        id: FieldId::ReleaseDate,
        section: "history",
        label: "Original Release Date",
        aliases: &["Original Release Date", "Release Date"],
        kind: FieldKind::Scalar,
        column: "Original Release Date",
    },
    FieldSpec {
        id: FieldId::Lineage,
        section: "history",
        label: "Lineage / Genetics",
        aliases: &["Lineage", "Genetics"],
        kind: FieldKind::Scalar,
        column: "Lineage / Genetics",
    },
    FieldSpec {
        id: FieldId::Trivia,
        section: "history",
        label: "Trivia (Interesting Facts)",
        aliases: &["Trivia"],
        kind: FieldKind::List { max: None },
        column: "Trivia",
    },
    FieldSpec {
        id: FieldId::Awards,
        section: "history",
        label: "Awards",
        aliases: &["Awards"],
        kind: FieldKind::CommaList { max: None },
        column: "Awards",
    },
    FieldSpec {
        id: FieldId::SimilarStrains,
        section: "history",
        label: "Similar Strains (Top 3 by effect/genetics)",
        aliases: &["Similar Strains"],
        kind: FieldKind::List { max: Some(3) },
        column: "Similar Strains",
    },
    FieldSpec {
        id: FieldId::Availability,
        section: "insights",
        label: "Availability by State",
        aliases: &["Availability"],
        kind: FieldKind::CommaList { max: None },
        column: "Availability by State",
    },
    FieldSpec {
        id: FieldId::Rating,
        section: "insights",
        label: "User Rating (Average Score, # of Reviews, Common Comments)",
        aliases: &["User Rating", "Rating"],
        kind: FieldKind::Rating,
        column: "User Rating",
    },
];

/// Maximum entries kept in rating comment lists.
pub const MAX_RATING_COMMENTS: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_spec() {
        for id in FieldId::ALL {
            assert_eq!(id.spec().id, id);
        }
        assert_eq!(STRAIN_SCHEMA.len(), FieldId::ALL.len());
    }

    #[test]
    fn columns_are_unique() {
        let mut columns: Vec<_> = STRAIN_SCHEMA.iter().map(|s| s.column).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), STRAIN_SCHEMA.len());
    }

    #[test]
    fn canonical_label_starts_with_first_alias() {
        for spec in STRAIN_SCHEMA {
            assert!(
                spec.label
                    .to_ascii_lowercase()
                    .starts_with(&spec.aliases[0].to_ascii_lowercase()),
                "{}: first alias must be the stable leading label text",
                spec.label
            );
        }
    }
}
