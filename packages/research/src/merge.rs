//! Record merger: fill gaps in a cached record from a fresh extraction.
//!
//! The merger never overwrites a present field. Cached values may have
//! been curated or verified; a backfill response is lower-confidence, so
//! it is only allowed to complete what is missing. Repeated queries
//! progressively fill sparse records without churn.

use crate::record::{Rating, StrainRecord};

/// Result of a merge: the combined record and whether anything was filled.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub record: StrainRecord,
    /// True iff at least one absent field was filled. Drives the decision
    /// to write the record back to the cache.
    pub changed: bool,
}

/// Merge a fresh extraction into an existing record.
///
/// With no existing record the fresh one is taken verbatim and `changed`
/// is true iff it carries any data beyond the name. Otherwise each absent
/// field of `existing` is filled from `fresh`; present fields are kept
/// unchanged regardless of what `fresh` says.
pub fn merge(existing: Option<&StrainRecord>, fresh: StrainRecord) -> MergeOutcome {
    let Some(existing) = existing else {
        let changed = fresh.has_data_beyond_name();
        return MergeOutcome {
            record: fresh,
            changed,
        };
    };

    let mut record = existing.clone();
    let mut changed = false;

    fill_text(&mut record.hybridization, fresh.hybridization, &mut changed);
    fill_text(&mut record.release_date, fresh.release_date, &mut changed);
    fill_text(&mut record.lineage, fresh.lineage, &mut changed);

    fill_list(&mut record.alt_names, fresh.alt_names, &mut changed);
    fill_list(&mut record.nicknames, fresh.nicknames, &mut changed);
    fill_list(&mut record.flavors, fresh.flavors, &mut changed);
    fill_list(&mut record.effects, fresh.effects, &mut changed);
    fill_list(
        &mut record.physical_characteristics,
        fresh.physical_characteristics,
        &mut changed,
    );
    fill_list(&mut record.trivia, fresh.trivia, &mut changed);
    fill_list(&mut record.awards, fresh.awards, &mut changed);
    fill_list(&mut record.similar_strains, fresh.similar_strains, &mut changed);
    fill_list(&mut record.availability, fresh.availability, &mut changed);

    fill_rating(&mut record.rating, fresh.rating, &mut changed);

    MergeOutcome { record, changed }
}

fn fill_text(existing: &mut String, fresh: String, changed: &mut bool) {
    if existing.trim().is_empty() && !fresh.trim().is_empty() {
        *existing = fresh;
        *changed = true;
    }
}

fn fill_list(existing: &mut Vec<String>, fresh: Vec<String>, changed: &mut bool) {
    if existing.is_empty() && !fresh.is_empty() {
        *existing = fresh;
        *changed = true;
    }
}

fn fill_rating(existing: &mut Option<Rating>, fresh: Option<Rating>, changed: &mut bool) {
    let present = existing.as_ref().is_some_and(Rating::is_present);
    if !present {
        if let Some(fresh) = fresh.filter(Rating::is_present) {
            *existing = Some(fresh);
            *changed = true;
        }
    }
}
