//! Field extractor: semi-structured provider text to a [`StrainRecord`].
//!
//! Provider responses follow a four-section plain-text contract, but the
//! format drifts: emphasis markup around labels, renamed or missing
//! sections, citation markers, "(Top 3)"-style label suffixes, "Unknown"
//! sentinels. The extractor is one generic routine over the declarative
//! schema table, tried from the most structured layout down:
//!
//! 1. scrub cosmetic noise (citations, markdown emphasis, wrap artifacts)
//! 2. split into sections on header lines; a field is searched in its
//!    declared section, falling back to the whole text when the section
//!    is absent
//! 3. match the stable leading label text (suffixes never required),
//!    first match wins for scalars
//! 4. read inline values or the following bullet block for list fields
//! 5. normalize sentinels to absence, dedupe, truncate to schema caps

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ResearchError, Result};
use crate::record::{is_absent_token, Rating, StrainRecord};
use crate::schema::{FieldId, FieldKind, FieldSpec, MAX_RATING_COMMENTS, STRAIN_SCHEMA};

fn citation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\d+\]").unwrap())
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap())
}

fn italic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*\n]+)\*").unwrap())
}

fn bold_underscore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__([^_\n]+)__").unwrap())
}

fn underscore_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^_([^_\n]+)_\s*:").unwrap())
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[=\-~#*]{2,}\s*([A-Za-z][A-Za-z0-9 /&'-]*?)\s*[=\-~#*]{2,}\s*$").unwrap()
    })
}

fn slash_score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*/\s*\d+").unwrap())
}

fn review_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d[\d,]*)\s*(\+)?\s*reviews?").unwrap())
}

/// Extract a full record. Fails with [`ResearchError::Unparseable`] when
/// no strain name is recoverable; callers treat that as equivalent to a
/// provider failure and must not cache the result.
pub fn extract(raw: &str) -> Result<StrainRecord> {
    let record = extract_fields(raw);
    if record.name.trim().is_empty() {
        return Err(ResearchError::Unparseable);
    }
    Ok(record)
}

/// Lenient extraction for targeted backfill responses, which may not
/// repeat the strain name. Returns whatever fields were found.
pub fn extract_fields(raw: &str) -> StrainRecord {
    let clean = scrub(raw);
    let lines: Vec<&str> = clean.lines().collect();
    let sections = split_sections(&lines);

    let mut record = StrainRecord::default();
    for spec in STRAIN_SCHEMA {
        let scope = sections
            .iter()
            .find(|s| s.name == spec.section)
            .map(|s| &lines[s.start..s.end])
            .unwrap_or(&lines);
        apply_field(&mut record, spec, scope);
    }
    record
}

/// Strip cosmetic noise: citation markers, emphasis markup, carriage
/// returns and trailing soft-wrap spaces.
pub fn scrub(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = citation_re().replace_all(&text, "");
    let text = bold_re().replace_all(&text, "$1");
    let text = italic_re().replace_all(&text, "$1");
    let text = bold_underscore_re().replace_all(&text, "$1");
    let text = underscore_label_re().replace_all(&text, "$1:");
    let text = text.replace("**", "");
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

struct SectionSpan {
    /// Lowercased section title from the header line.
    name: String,
    start: usize,
    end: usize,
}

fn split_sections(lines: &[&str]) -> Vec<SectionSpan> {
    let mut spans: Vec<SectionSpan> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(caps) = header_re().captures(line) {
            if let Some(last) = spans.last_mut() {
                last.end = idx;
            }
            spans.push(SectionSpan {
                name: caps[1].trim().to_lowercase(),
                start: idx + 1,
                end: lines.len(),
            });
        }
    }
    spans
}

/// Match a known label at the start of a line, case-insensitively.
///
/// The label may be followed by a short suffix ("(Top 3)", "by State",
/// "/ Genetics") before the colon; the suffix is never required. Returns
/// the inline text after the colon, trimmed.
fn match_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let head = trimmed.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = &trimmed[label.len()..];
    // Word boundary: "Name" must not match "Names" or "Nameless"
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    let colon = rest.find(':')?;
    let suffix = &rest[..colon];
    if suffix.len() > 64 || suffix.contains('.') {
        return None;
    }
    Some(rest[colon + 1..].trim())
}

/// First line matching any of the field's label aliases (first-match-wins:
/// later duplicate labels in the same scope are ignored).
fn find_label<'a>(lines: &[&'a str], spec: &FieldSpec) -> Option<(usize, &'a str)> {
    for (idx, line) in lines.iter().enumerate() {
        for alias in spec.aliases {
            if let Some(value) = match_label(line, alias) {
                return Some((idx, value));
            }
        }
    }
    None
}

/// Collect the bullet block immediately following a label line. Blank
/// lines are skipped; the first non-bullet, non-blank line ends the block.
fn collect_bullets(lines: &[&str], start: usize) -> Vec<String> {
    let mut items = Vec::new();
    for line in lines.iter().skip(start) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(item) = strip_bullet(trimmed) {
            if !item.is_empty() {
                items.push(item.to_string());
            }
        } else {
            break;
        }
    }
    items
}

fn strip_bullet(line: &str) -> Option<&str> {
    let stripped = line.strip_prefix(['-', '•', '*'])?;
    Some(stripped.trim_start_matches(['-', '•', '*']).trim())
}

fn apply_field(record: &mut StrainRecord, spec: &FieldSpec, lines: &[&str]) {
    let Some((idx, inline)) = find_label(lines, spec) else {
        return;
    };

    match spec.kind {
        FieldKind::Scalar => {
            if !inline.is_empty() && !is_absent_token(inline) {
                set_scalar(record, spec.id, inline.to_string());
            }
        }
        FieldKind::CommaList { max } => {
            let items = if !inline.is_empty() {
                inline.split(',').map(str::to_string).collect()
            } else {
                collect_bullets(lines, idx + 1)
            };
            set_list(record, spec.id, finish_list(items, max));
        }
        FieldKind::List { max } => {
            let items = if !inline.is_empty() {
                vec![inline.to_string()]
            } else {
                collect_bullets(lines, idx + 1)
            };
            set_list(record, spec.id, finish_list(items, max));
        }
        FieldKind::Rating => {
            let mut entries = Vec::new();
            if !inline.is_empty() {
                entries.push(inline.to_string());
            }
            entries.extend(collect_bullets(lines, idx + 1));
            let entries: Vec<&str> = entries.iter().map(String::as_str).collect();
            record.rating = parse_rating_entries(&entries);
        }
    }
}

/// Parse the rating block entries: one score/review-count line plus up to
/// three quoted comment lines, in any order. Also used as the row codec
/// for the spreadsheet's rating cell.
pub fn parse_rating_entries(entries: &[&str]) -> Option<Rating> {
    let mut rating = Rating::default();
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() || is_absent_token(entry) {
            continue;
        }
        let lower = entry.to_lowercase();
        // "Unknown (0 reviews)" means no rating, not a zero-review rating
        if lower.starts_with("unknown") {
            continue;
        }

        let is_score_line = slash_score_re().is_match(entry) || lower.contains("review");
        if is_score_line && rating.score.is_none() && rating.review_count.is_none() {
            if let Some(caps) = slash_score_re().captures(entry) {
                rating.score = caps[1].parse().ok();
            }
            if let Some(caps) = review_count_re().captures(entry) {
                let digits = caps[1].replace(',', "");
                let plus = caps.get(2).map_or("", |m| m.as_str());
                rating.review_count = Some(format!("{digits}{plus}"));
            }
            continue;
        }

        rating.comments.push(strip_quotes(entry).to_string());
    }

    rating.comments = finish_list(rating.comments, Some(MAX_RATING_COMMENTS));
    rating.is_present().then_some(rating)
}

/// Strip one layer of enclosing straight or curly quotes.
fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix(['"', '\'', '\u{201C}', '\u{2018}'])
        .unwrap_or(text);
    let text = text
        .strip_suffix(['"', '\'', '\u{201D}', '\u{2019}'])
        .unwrap_or(text);
    text.trim()
}

/// Drop sentinels and empties, dedupe case-insensitively preserving
/// first-seen order, truncate to the schema cap.
fn finish_list(items: Vec<String>, max: Option<usize>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.trim();
        if item.is_empty() || is_absent_token(item) {
            continue;
        }
        let key = item.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(item.to_string());
    }
    if let Some(max) = max {
        out.truncate(max);
    }
    out
}

fn set_scalar(record: &mut StrainRecord, id: FieldId, value: String) {
    match id {
        FieldId::Name => record.name = value,
        FieldId::Hybridization => record.hybridization = value,
        FieldId::ReleaseDate => record.release_date = value,
        FieldId::Lineage => record.lineage = value,
        _ => unreachable!("scalar setter called for non-scalar field"),
    }
}

fn set_list(record: &mut StrainRecord, id: FieldId, values: Vec<String>) {
    match id {
        FieldId::AltNames => record.alt_names = values,
        FieldId::Nicknames => record.nicknames = values,
        FieldId::Flavors => record.flavors = values,
        FieldId::Effects => record.effects = values,
        FieldId::PhysicalCharacteristics => record.physical_characteristics = values,
        FieldId::Trivia => record.trivia = values,
        FieldId::Awards => record.awards = values,
        FieldId::SimilarStrains => record.similar_strains = values,
        FieldId::Availability => record.availability = values,
        _ => unreachable!("list setter called for non-list field"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPORT: &str = r#"=== NAME ===
Strain Name: GG #4
Alt Name(s): Original Glue, Gorilla Glue #4, Glue
Nickname(s): GG4, The Glue, Couch-Glue

=== ATTRIBUTES ===
Hybridization: Hybrid
Reported Flavors (Top 3):
- Earthy
- Pine
- Chocolate
Reported Effects (Top 3):
- Heavy euphoria
- Munchies
- Mood elevation
Physical Characteristics (Color, Bud Structure, Trichomes):
- Dense, medium-green buds with lime & olive hues
- Thick blanket of milky trichomes
- Sparse but vivid orange pistils

=== HISTORY ===
Original Release Date: Released to market circa 2013
Lineage / Genetics: Chem's Sister x Sour Dubb x Chocolate Diesel
Trivia (Interesting Facts):
- Named for the ultra-sticky resin that glued trimming scissors together
- Forced to rebrand as Original Glue after trademark litigation
Awards: 1st Place Hybrid - Cannabis Cup Michigan 2014, 1st Place - World Cup Jamaica 2015
Similar Strains (Top 3 by effect/genetics):
- GG #5
- Chem D
- Sour Diesel

=== INSIGHTS ===
Availability by State: CA,CO,NV,WA
User Rating (Average Score, # of Reviews, Common Comments):
- 4.6 / 5 (5,400+ reviews)
- "instant head euphoria then body melt"
- "sticky buds"
- "strong relief for stress and pain"
"#;

    #[test]
    fn extracts_every_field_from_a_full_report() {
        let record = extract(FULL_REPORT).unwrap();

        assert_eq!(record.name, "GG #4");
        assert_eq!(
            record.alt_names,
            vec!["Original Glue", "Gorilla Glue #4", "Glue"]
        );
        assert_eq!(record.nicknames, vec!["GG4", "The Glue", "Couch-Glue"]);
        assert_eq!(record.hybridization, "Hybrid");
        assert_eq!(record.flavors, vec!["Earthy", "Pine", "Chocolate"]);
        assert_eq!(record.effects.len(), 3);
        assert_eq!(record.physical_characteristics.len(), 3);
        assert_eq!(record.release_date, "Released to market circa 2013");
        assert_eq!(
            record.lineage,
            "Chem's Sister x Sour Dubb x Chocolate Diesel"
        );
        assert_eq!(record.trivia.len(), 2);
        assert_eq!(record.awards.len(), 2);
        assert_eq!(record.similar_strains, vec!["GG #5", "Chem D", "Sour Diesel"]);
        assert_eq!(record.availability, vec!["CA", "CO", "NV", "WA"]);

        let rating = record.rating.as_ref().unwrap();
        assert_eq!(rating.score, Some(4.6));
        assert_eq!(rating.review_count.as_deref(), Some("5400+"));
        assert_eq!(
            rating.comments,
            vec![
                "instant head euphoria then body melt",
                "sticky buds",
                "strong relief for stress and pain"
            ]
        );
        assert!(record.absent_fields().is_empty());
    }

    #[test]
    fn sentinel_values_become_absent_fields() {
        let record =
            extract("Strain Name: Blue Dream\nAlt Name(s): Unknown\nHybridization: Hybrid\n")
                .unwrap();

        assert_eq!(record.name, "Blue Dream");
        assert!(record.alt_names.is_empty());
        assert_eq!(record.hybridization, "Hybrid");
        assert!(record.lineage.is_empty());
        assert!(record.rating.is_none());
    }

    #[test]
    fn labels_match_through_emphasis_markup_and_case_drift() {
        let text = "**Strain Name:** Sour Diesel\n__hybridization__: Sativa-dominant\n_Lineage / Genetics_: Chemdawg x Super Skunk\n";
        let record = extract(text).unwrap();
        assert_eq!(record.name, "Sour Diesel");
        assert_eq!(record.hybridization, "Sativa-dominant");
        assert_eq!(record.lineage, "Chemdawg x Super Skunk");
    }

    #[test]
    fn citation_markers_are_stripped() {
        let record = extract("Strain Name: Blue Dream[1]\nHybridization: Hybrid[2][3]\n").unwrap();
        assert_eq!(record.name, "Blue Dream");
        assert_eq!(record.hybridization, "Hybrid");
    }

    #[test]
    fn list_fields_truncate_to_top_three_in_order() {
        let text = "Strain Name: Test\nReported Flavors (Top 3):\n- One\n- Two\n- Three\n- Four\n- Five\n";
        let record = extract(text).unwrap();
        assert_eq!(record.flavors, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn list_fields_dedupe_case_insensitively() {
        let text = "Strain Name: Test\nReported Effects:\n- Euphoric\n- euphoric\n- Relaxed\n";
        let record = extract(text).unwrap();
        assert_eq!(record.effects, vec!["Euphoric", "Relaxed"]);
    }

    #[test]
    fn scalar_fields_take_the_first_match_only() {
        let text = "Strain Name: First\nStrain Name: Second\n";
        let record = extract(text).unwrap();
        assert_eq!(record.name, "First");
    }

    #[test]
    fn bullet_block_stops_at_first_non_bullet_line() {
        let text = "Strain Name: Test\nReported Flavors:\n- Earthy\n- Pine\nHybridization: Hybrid\n- stray bullet\n";
        let record = extract(text).unwrap();
        assert_eq!(record.flavors, vec!["Earthy", "Pine"]);
        assert_eq!(record.hybridization, "Hybrid");
    }

    #[test]
    fn section_headers_are_case_insensitive() {
        let text = "=== name ===\nStrain Name: Test\n=== Insights ===\nAvailability by State: CA, OR\n";
        let record = extract(text).unwrap();
        assert_eq!(record.availability, vec!["CA", "OR"]);
    }

    #[test]
    fn label_suffix_is_not_required_for_a_match() {
        let text = "Strain Name: Test\nSimilar Strains:\n- A\n- B\n";
        let record = extract(text).unwrap();
        assert_eq!(record.similar_strains, vec!["A", "B"]);
    }

    #[test]
    fn nickname_label_does_not_shadow_name() {
        let text = "Nickname(s): BD\nStrain Name: Blue Dream\n";
        let record = extract(text).unwrap();
        assert_eq!(record.name, "Blue Dream");
        assert_eq!(record.nicknames, vec!["BD"]);
    }

    #[test]
    fn curly_quoted_comments_are_stripped() {
        let entries = vec![
            "4.3 / 5 (135+ reviews)",
            "\u{201C}perfect balance\u{201D}",
            "'smooth smoke'",
        ];
        let rating = parse_rating_entries(&entries).unwrap();
        assert_eq!(rating.score, Some(4.3));
        assert_eq!(rating.review_count.as_deref(), Some("135+"));
        assert_eq!(rating.comments, vec!["perfect balance", "smooth smoke"]);
    }

    #[test]
    fn unknown_rating_line_is_absent() {
        let rating = parse_rating_entries(&["Unknown (0 reviews)"]);
        assert!(rating.is_none());
    }

    #[test]
    fn unparseable_text_is_an_explicit_error() {
        let err = extract("Insufficient data for strain 'Galactic Runtz'.").unwrap_err();
        assert!(matches!(err, ResearchError::Unparseable));
    }

    #[test]
    fn backfill_fragments_extract_without_a_name() {
        let record = extract_fields("Awards: Cup Winner 2003\n");
        assert!(record.name.is_empty());
        assert_eq!(record.awards, vec!["Cup Winner 2003"]);
    }
}
