//! Integration tests for the research orchestrator.
//!
//! These cover the three per-query paths end to end against the memory
//! store and a scripted provider:
//! 1. Cache hit with a complete record: answer without a provider call
//! 2. Cache hit with gaps: targeted backfill, fill-only merge, update
//! 3. Cache miss: full research call, extract, insert

use std::sync::Arc;

use research::testing::{FailingStore, MockProvider};
use research::{
    ChatTurn, MemoryStore, Rating, RecordSource, Researcher, StrainRecord, StrainStore,
};

const FULL_REPORT: &str = r#"=== NAME ===
Strain Name: Blue Dream
Alt Name(s): Azure Haze
Nickname(s): BD

=== ATTRIBUTES ===
Hybridization: Sativa-dominant Hybrid
Reported Flavors (Top 3):
- Sweet Berry
- Vanilla
- Herbal
Reported Effects (Top 3):
- Euphoric
- Creative
- Relaxed
Physical Characteristics (Color, Bud Structure, Trichomes):
- Deep green with blue undertones
- Dense, medium-sized nugs
- Abundant crystal coating

=== HISTORY ===
Original Release Date: 2003
Lineage / Genetics: Blueberry x Super Silver Haze
Trivia (Interesting Facts):
- One of the most popular strains in California dispensaries
Awards: Cannabis Cup Winner 2003
Similar Strains (Top 3 by effect/genetics):
- Green Crack
- Sour Diesel
- Pineapple Express

=== INSIGHTS ===
Availability by State: CA,CO,WA
User Rating (Average Score, # of Reviews, Common Comments):
- 4.6 / 5 (2847 reviews)
- "Perfect balance"
- "Great for daytime"
- "Smooth smoke"
"#;

fn complete_record() -> StrainRecord {
    StrainRecord {
        name: "Blue Dream".into(),
        alt_names: vec!["Azure Haze".into()],
        nicknames: vec!["BD".into()],
        hybridization: "Sativa-dominant Hybrid".into(),
        flavors: vec!["Sweet Berry".into(), "Vanilla".into(), "Herbal".into()],
        effects: vec!["Euphoric".into(), "Creative".into(), "Relaxed".into()],
        physical_characteristics: vec![
            "Deep green with blue undertones".into(),
            "Dense, medium-sized nugs".into(),
        ],
        release_date: "2003".into(),
        lineage: "Blueberry x Super Silver Haze".into(),
        trivia: vec!["Popular in California dispensaries".into()],
        awards: vec!["Cannabis Cup Winner 2003".into()],
        similar_strains: vec!["Green Crack".into(), "Sour Diesel".into()],
        availability: vec!["CA".into(), "CO".into()],
        rating: Some(Rating {
            score: Some(4.6),
            review_count: Some("2847".into()),
            comments: vec!["Perfect balance".into()],
        }),
    }
}

#[tokio::test]
async fn cache_miss_researches_extracts_and_inserts() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(MockProvider::new().with_response(FULL_REPORT));
    let researcher = Researcher::new(store.clone(), provider.clone());

    let outcome = researcher.research("blue dream", &[]).await;

    assert_eq!(outcome.source, RecordSource::Provider);
    let record = outcome.record.expect("record extracted");
    assert_eq!(record.name, "Blue Dream");
    assert_eq!(outcome.raw, FULL_REPORT);

    // Record was cached
    assert_eq!(store.len(), 1);
    let hit = store.find_by_query("blue dream").await.unwrap().unwrap();
    assert_eq!(hit.record.name, "Blue Dream");
}

#[tokio::test]
async fn complete_cache_hit_answers_without_a_provider_call() {
    let store = Arc::new(MemoryStore::with_records([complete_record()]));
    let provider = Arc::new(MockProvider::new());
    let researcher = Researcher::new(store.clone(), provider.clone());

    let outcome = researcher.research("BD", &[]).await;

    assert_eq!(outcome.source, RecordSource::Cache);
    assert_eq!(outcome.record.unwrap().name, "Blue Dream");
    assert!(outcome.raw.contains("Strain Name: Blue Dream"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn partial_cache_hit_backfills_only_absent_fields() {
    let mut cached = complete_record();
    cached.awards.clear();
    let store = Arc::new(MemoryStore::with_records([cached]));
    let provider = Arc::new(MockProvider::new().with_response("Awards: Cup Winner 2003\n"));
    let researcher = Researcher::new(store.clone(), provider.clone());

    let outcome = researcher.research("blue dream", &[]).await;

    assert_eq!(outcome.source, RecordSource::Cache);
    let record = outcome.record.unwrap();
    assert_eq!(record.awards, vec!["Cup Winner 2003"]);
    // Present fields survived the merge
    assert_eq!(record.hybridization, "Sativa-dominant Hybrid");

    // The targeted request asked for the absent field only
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].system_prompt.contains("- Awards"));
    assert!(!calls[0].system_prompt.contains("Reported Flavors"));
    assert_eq!(calls[0].messages.len(), 1);
    assert_eq!(calls[0].messages[0].content, "Blue Dream");

    // The filled record was persisted
    let stored = store.records();
    assert_eq!(stored[0].awards, vec!["Cup Winner 2003"]);
}

#[tokio::test]
async fn backfill_that_fills_nothing_skips_the_update() {
    let mut cached = complete_record();
    cached.awards.clear();
    let store = Arc::new(MemoryStore::with_records([cached.clone()]));
    let provider = Arc::new(MockProvider::new().with_response("Awards: Unknown\n"));
    let researcher = Researcher::new(store.clone(), provider);

    let outcome = researcher.research("blue dream", &[]).await;

    assert_eq!(outcome.source, RecordSource::Cache);
    assert!(outcome.record.unwrap().awards.is_empty());
    assert_eq!(store.records()[0], cached);
}

#[tokio::test]
async fn backfill_failure_returns_the_cached_record_unchanged() {
    let mut cached = complete_record();
    cached.lineage.clear();
    let store = Arc::new(MemoryStore::with_records([cached.clone()]));
    let provider = Arc::new(MockProvider::new().with_failure("HTTP 500"));
    let researcher = Researcher::new(store.clone(), provider);

    let outcome = researcher.research("blue dream", &[]).await;

    assert_eq!(outcome.source, RecordSource::Cache);
    assert_eq!(outcome.record.unwrap(), cached);
    assert_eq!(store.records()[0], cached);
}

#[tokio::test]
async fn provider_failure_on_miss_returns_the_static_fallback() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(MockProvider::new().with_failure("HTTP 500"));
    let researcher = Researcher::new(store.clone(), provider);

    let outcome = researcher.research("galactic runtz", &[]).await;

    assert_eq!(outcome.source, RecordSource::Fallback);
    assert!(outcome.record.is_none());
    assert!(outcome.raw.contains("strain database"));
    // Nothing was cached
    assert!(store.is_empty());
}

#[tokio::test]
async fn unparseable_response_surfaces_raw_text_without_caching() {
    let store = Arc::new(MemoryStore::new());
    let raw = "Insufficient data for strain 'Galactic Runtz'.";
    let provider = Arc::new(MockProvider::new().with_response(raw));
    let researcher = Researcher::new(store.clone(), provider);

    let outcome = researcher.research("galactic runtz", &[]).await;

    assert_eq!(outcome.source, RecordSource::Provider);
    assert!(outcome.record.is_none());
    assert_eq!(outcome.raw, raw);
    assert!(store.is_empty());
}

#[tokio::test]
async fn unreachable_cache_forces_the_full_research_path() {
    let provider = Arc::new(MockProvider::new().with_response(FULL_REPORT));
    let researcher = Researcher::new(FailingStore::new(), provider.clone());

    let outcome = researcher.research("blue dream", &[]).await;

    // Insert failure is swallowed; the record still comes back
    assert_eq!(outcome.source, RecordSource::Provider);
    assert_eq!(outcome.record.unwrap().name, "Blue Dream");
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn conversation_history_is_windowed_before_the_provider_call() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(MockProvider::new().with_response(FULL_REPORT));
    let researcher = Researcher::new(store, provider.clone());

    let history: Vec<ChatTurn> = (0..14)
        .map(|i| {
            if i % 2 == 0 {
                ChatTurn::user(format!("question {i}"))
            } else {
                ChatTurn::assistant(format!("answer {i}"))
            }
        })
        .collect();

    researcher.research("blue dream", &history).await;

    let calls = provider.calls();
    // Last 10 history turns plus the query itself
    assert_eq!(calls[0].messages.len(), 11);
    assert_eq!(calls[0].messages[0].content, "question 4");
    assert_eq!(calls[0].messages.last().unwrap().content, "blue dream");
}
