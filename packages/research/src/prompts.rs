//! Prompt templates for the completion and image providers.
//!
//! Prompt text is configuration, not code: the report contract lives in
//! one versioned template consumed together with the field schema, and a
//! hash of the template is exposed so cached rows written under an older
//! prompt revision can be told apart.

use sha2::{Digest, Sha256};

use crate::schema::FieldId;

/// System prompt for a full strain research query.
///
/// The provider must answer in the four-block plain-text layout the
/// extractor understands: exact labels, hyphen bullets, comma lists,
/// "Unknown" for missing values.
pub const RESEARCH_PROMPT: &str = r#"You are a cannabis-industry research assistant.
Return ONLY the following 14 data fields for the strain you're given, using plain text and the exact labels below. Do not use bold (**), italics, or any other markdown. Do not add extra notes, explanations, or text outside the specified blocks. If a value is unknown, write "Unknown". Always use bullets (-) for lists. For User Rating, always start with a numeric average like "4.3 / 5 (135+ reviews)" or "Unknown (0 reviews)" - use + for approximations (e.g., 1000+), never words like "thousands". For comments, list exactly 3 quoted bullets. For Availability, use comma-separated 2-letter state codes only (e.g., CA,CO,WA) or "Unknown".

Put the lines into the four blocks shown, separated by a blank line before and after each block header.
If the strain is a new hybrid and/or information is limited, use "Unknown" for missing fields and do not add extra text.

=== NAME ===
Strain Name: <text>
Alt Name(s): <comma-separated list or "Unknown">
Nickname(s): <comma-separated list or "Unknown">

=== ATTRIBUTES ===
Hybridization: <Indica | Sativa | Hybrid>
Reported Flavors (Top 3):
- <flavor 1>
- <flavor 2>
- <flavor 3>
Reported Effects (Top 3):
- <effect 1>
- <effect 2>
- <effect 3>
Physical Characteristics (Color, Bud Structure, Trichomes):
- <bullet 1>
- <bullet 2>
- <bullet 3>

=== HISTORY ===
Original Release Date: <text or "Unknown">
Lineage / Genetics: <text or "Unknown">
Trivia (Interesting Facts):
- <bullet 1>
- <bullet 2>
- <bullet 3>
Awards: <comma-separated list or "Unknown">
Similar Strains (Top 3 by effect/genetics):
- <strain 1>
- <strain 2>
- <strain 3>

=== INSIGHTS ===
Availability by State: <comma-separated 2-letter codes or "Unknown">
User Rating (Average Score, # of Reviews, Common Comments):
- <e.g. "4.3 / 5 (135+ reviews)">
- "<comment 1>"
- "<comment 2>"
- "<comment 3>"
"#;

/// System prompt for a targeted backfill query scoped to named fields.
pub const BACKFILL_PROMPT: &str = r#"You are a cannabis-industry research assistant.
You will be given the name of a cannabis strain. Return ONLY the fields listed below for that strain, in plain text with the exact labels shown, one field per label. Use bullets (-) for list values and comma-separated values for name/award/state lists. If a value is unknown, write "Unknown". Do not return any other fields or commentary.

Fields to return:
{fields}
"#;

/// Static educational text returned when the completion provider is
/// unavailable. Surfaced as a normal chat response, never an error dialog.
pub const FALLBACK_TEXT: &str = r#"I'm currently having trouble accessing the strain database, but I can provide some general guidance:

For strain research, typically look for:
- Genetics & Lineage - Parent strains and breeding history
- Cannabinoid Profile - THC/CBD percentages and ratios
- Effects - Physical and mental experiences reported

Popular strain categories:
- Sativa - Often energizing, creative, daytime use
- Indica - Typically relaxing, sedating, evening use
- Hybrid - Balanced effects from both types

Please try your search again in a moment!"#;

/// Prompt template for the image provider, completed with the record's
/// physical characteristics verbatim.
pub const IMAGE_PROMPT: &str = r#"Studio photograph of a single cannabis bud still on its stem.
Based on these physical characteristics: {characteristics}.
The bud is set against a COMPLETELY BLACK, non-reflective background.
Focus is tack-sharp on trichomes and pistils. Edges of the bud are crisp and clear,
with absolutely no white border, halo, or outline. There shouldn't be ANY white color in the image."#;

/// Format the backfill prompt for the given absent fields.
pub fn format_backfill_prompt(fields: &[FieldId]) -> String {
    let field_lines = fields
        .iter()
        .map(|f| format!("- {}", f.label()))
        .collect::<Vec<_>>()
        .join("\n");
    BACKFILL_PROMPT.replace("{fields}", &field_lines)
}

/// Format the image prompt from the physical-characteristics fragment,
/// optionally prefixed with the strain's identity.
pub fn format_image_prompt(
    characteristics: &str,
    name: Option<&str>,
    hybridization: Option<&str>,
) -> String {
    let mut prompt = IMAGE_PROMPT.replace("{characteristics}", characteristics);
    match (name, hybridization) {
        (Some(name), Some(hybridization)) => {
            prompt.push_str(&format!("\nThe strain is {name}, a {hybridization}."));
        }
        (Some(name), None) => {
            prompt.push_str(&format!("\nThe strain is {name}."));
        }
        _ => {}
    }
    prompt
}

/// Hash of the research prompt template, for telling apart cache rows
/// written under an older prompt revision.
pub fn research_prompt_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(RESEARCH_PROMPT.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_hash_is_consistent() {
        let hash1 = research_prompt_hash();
        let hash2 = research_prompt_hash();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 hex
    }

    #[test]
    fn research_prompt_names_every_schema_label() {
        for field in FieldId::ALL {
            assert!(
                RESEARCH_PROMPT.contains(field.label()),
                "prompt is missing label {:?}",
                field.label()
            );
        }
    }

    #[test]
    fn backfill_prompt_lists_only_requested_fields() {
        let prompt = format_backfill_prompt(&[FieldId::Awards, FieldId::Lineage]);
        assert!(prompt.contains("- Awards"));
        assert!(prompt.contains("- Lineage / Genetics"));
        assert!(!prompt.contains("Reported Flavors"));
    }

    #[test]
    fn image_prompt_splices_characteristics_verbatim() {
        let prompt = format_image_prompt("Dense green buds; milky trichomes", None, None);
        assert!(prompt.contains("Dense green buds; milky trichomes"));
        assert!(!prompt.contains("{characteristics}"));
    }

    #[test]
    fn image_prompt_appends_identity_when_known() {
        let prompt = format_image_prompt("buds", Some("GG #4"), Some("Hybrid"));
        assert!(prompt.ends_with("The strain is GG #4, a Hybrid."));
    }
}
