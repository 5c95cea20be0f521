//! The canonical strain record and its field-presence rules.

use serde::{Deserialize, Serialize};

use crate::schema::FieldId;

/// Tokens that mean "no data" in provider text and sheet cells.
///
/// A value equal to one of these (case-insensitive) is treated as absent,
/// never as a literal string. The merger depends on this normalization.
pub const ABSENCE_TOKENS: &[&str] = &["unknown", "n/a", "none"];

/// True if the text is an absence sentinel.
pub fn is_absent_token(text: &str) -> bool {
    let trimmed = text.trim().trim_end_matches('.').trim();
    ABSENCE_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// User rating block: average score, review count, common comments.
///
/// `review_count` keeps the "+" approximation suffix verbatim
/// (e.g. "5400+").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rating {
    pub score: Option<f64>,
    pub review_count: Option<String>,
    pub comments: Vec<String>,
}

impl Rating {
    /// True if any part of the rating carries data.
    pub fn is_present(&self) -> bool {
        self.score.is_some() || self.review_count.is_some() || !self.comments.is_empty()
    }
}

/// The canonical structured strain entity.
///
/// `name` is the only mandatory field; every list field defaults to an
/// empty container, never null. A record without a name is invalid and
/// must not be cached or rendered as a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrainRecord {
    pub name: String,
    pub alt_names: Vec<String>,
    pub nicknames: Vec<String>,
    pub hybridization: String,
    pub flavors: Vec<String>,
    pub effects: Vec<String>,
    /// Bullet lines used verbatim as the image-generation prompt fragment.
    pub physical_characteristics: Vec<String>,
    pub release_date: String,
    pub lineage: String,
    pub trivia: Vec<String>,
    pub awards: Vec<String>,
    pub similar_strains: Vec<String>,
    pub availability: Vec<String>,
    pub rating: Option<Rating>,
}

impl StrainRecord {
    /// Create an otherwise-empty record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// True if the field currently carries data.
    pub fn has_field(&self, field: FieldId) -> bool {
        match field {
            FieldId::Name => !self.name.trim().is_empty(),
            FieldId::AltNames => !self.alt_names.is_empty(),
            FieldId::Nicknames => !self.nicknames.is_empty(),
            FieldId::Hybridization => !self.hybridization.trim().is_empty(),
            FieldId::Flavors => !self.flavors.is_empty(),
            FieldId::Effects => !self.effects.is_empty(),
            FieldId::PhysicalCharacteristics => !self.physical_characteristics.is_empty(),
            FieldId::ReleaseDate => !self.release_date.trim().is_empty(),
            FieldId::Lineage => !self.lineage.trim().is_empty(),
            FieldId::Trivia => !self.trivia.is_empty(),
            FieldId::Awards => !self.awards.is_empty(),
            FieldId::SimilarStrains => !self.similar_strains.is_empty(),
            FieldId::Availability => !self.availability.is_empty(),
            FieldId::Rating => self.rating.as_ref().is_some_and(Rating::is_present),
        }
    }

    /// Every non-name field currently holding no data, in report order.
    ///
    /// Drives the targeted backfill query for partially cached records.
    pub fn absent_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|&f| f != FieldId::Name && !self.has_field(f))
            .collect()
    }

    /// True if any field beyond the name carries data.
    pub fn has_data_beyond_name(&self) -> bool {
        FieldId::ALL
            .into_iter()
            .any(|f| f != FieldId::Name && self.has_field(f))
    }

    /// Cache match policy: case-insensitive substring match tested against
    /// the canonical name, then alt names, then nicknames. Either direction
    /// of containment counts, to tolerate partially typed queries.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        contains_either(&self.name, &query)
            || self.alt_names.iter().any(|n| contains_either(n, &query))
            || self.nicknames.iter().any(|n| contains_either(n, &query))
    }
}

fn contains_either(stored: &str, query_lower: &str) -> bool {
    let stored = stored.trim().to_lowercase();
    if stored.is_empty() {
        return false;
    }
    stored.contains(query_lower) || query_lower.contains(&stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absence_tokens_are_case_insensitive() {
        assert!(is_absent_token("Unknown"));
        assert!(is_absent_token("  UNKNOWN "));
        assert!(is_absent_token("n/a"));
        assert!(is_absent_token("None."));
        assert!(!is_absent_token("Unknown origin"));
        assert!(!is_absent_token("Blue Dream"));
    }

    #[test]
    fn name_is_the_only_mandatory_field() {
        let record = StrainRecord::new("Blue Dream");
        assert!(record.has_field(FieldId::Name));
        assert!(!record.has_data_beyond_name());
        assert_eq!(record.absent_fields().len(), FieldId::ALL.len() - 1);
    }

    #[test]
    fn rating_presence_requires_data() {
        let mut record = StrainRecord::new("GG #4");
        record.rating = Some(Rating::default());
        assert!(!record.has_field(FieldId::Rating));

        record.rating = Some(Rating {
            score: Some(4.6),
            ..Default::default()
        });
        assert!(record.has_field(FieldId::Rating));
    }

    #[test]
    fn matches_query_checks_name_aliases_and_nicknames() {
        let record = StrainRecord {
            name: "GG #4".into(),
            alt_names: vec!["Original Glue".into(), "Gorilla Glue #4".into()],
            nicknames: vec!["GG4".into(), "The Glue".into()],
            ..Default::default()
        };

        assert!(record.matches_query("gg4"));
        assert!(record.matches_query("original glue"));
        assert!(record.matches_query("gorilla"));
        // Partial typed query contained in a stored value
        assert!(record.matches_query("glue #4"));
        // Stored value contained in a longer query
        assert!(record.matches_query("the GG4 strain")); // "gg4" ⊂ query
        assert!(!record.matches_query("blue dream"));
        assert!(!record.matches_query("   "));
    }
}
