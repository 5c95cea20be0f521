//! Research orchestrator: the cache-hit / backfill / miss state machine.
//!
//! Each query runs one linear pass with no retries:
//!
//! - hit with a complete record: return immediately, no provider call
//! - hit with absent fields: one targeted backfill call, merge fill-only,
//!   persist when something changed
//! - miss (or unreachable cache): one full provider call, extract, insert
//!   best-effort
//!
//! No failure here is fatal: provider failure degrades to the static
//! fallback text, cache failure to a forced miss, unparseable text to an
//! unstructured chat response.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::extract;
use crate::merge::merge;
use crate::prompts::{format_backfill_prompt, FALLBACK_TEXT, RESEARCH_PROMPT};
use crate::record::StrainRecord;
use crate::render::record_to_text;
use crate::traits::provider::{ChatTurn, CompletionProvider, CompletionRequest};
use crate::traits::store::{CacheHit, StrainStore};

/// Sampling and windowing knobs for provider requests.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Prior conversation messages kept when building the provider request.
    pub max_history: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.2,
            max_history: 10,
        }
    }
}

/// Where the returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Cache,
    Provider,
    Fallback,
}

/// Result of one research query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchOutcome {
    /// Structured record, absent when nothing parseable was produced.
    pub record: Option<StrainRecord>,
    /// Chat-displayable text: provider output, the regenerated report for
    /// cache hits, or the static fallback.
    pub raw: String,
    pub source: RecordSource,
}

/// The research control component, generic over cache store and provider.
pub struct Researcher<S, P> {
    store: S,
    provider: P,
    config: ResearchConfig,
}

impl<S: StrainStore, P: CompletionProvider> Researcher<S, P> {
    pub fn new(store: S, provider: P) -> Self {
        Self {
            store,
            provider,
            config: ResearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one query through the cache-hit / backfill / miss state machine.
    pub async fn research(&self, query: &str, history: &[ChatTurn]) -> ResearchOutcome {
        let query = query.trim();

        let hit = match self.store.find_by_query(query).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "strain cache lookup failed, forcing miss");
                None
            }
        };

        match hit {
            Some(hit) => {
                let absent = hit.record.absent_fields();
                if absent.is_empty() {
                    debug!(strain = %hit.record.name, "cache hit, record complete");
                    return ResearchOutcome {
                        raw: record_to_text(&hit.record),
                        record: Some(hit.record),
                        source: RecordSource::Cache,
                    };
                }
                info!(
                    strain = %hit.record.name,
                    absent = absent.len(),
                    "cache hit with gaps, backfilling"
                );
                self.backfill(hit, &absent).await
            }
            None => self.full_research(query, history).await,
        }
    }

    /// Targeted backfill: ask only for the absent fields, merge fill-only,
    /// persist when something changed. The cached record is returned
    /// unchanged if the provider or the update fails.
    async fn backfill(
        &self,
        hit: CacheHit,
        absent: &[crate::schema::FieldId],
    ) -> ResearchOutcome {
        let request = CompletionRequest {
            system_prompt: format_backfill_prompt(absent),
            messages: vec![ChatTurn::user(&hit.record.name)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let record = match self.provider.complete(request).await {
            Ok(text) => {
                let fresh = extract::extract_fields(&text);
                let outcome = merge(Some(&hit.record), fresh);
                if outcome.changed {
                    debug!(strain = %outcome.record.name, "backfill filled gaps, persisting");
                    if let Err(e) = self.store.update(hit.locator, &outcome.record).await {
                        warn!(error = %e, "cache update failed");
                    }
                }
                outcome.record
            }
            Err(e) => {
                warn!(error = %e, "backfill call failed, returning cached record");
                hit.record
            }
        };

        ResearchOutcome {
            raw: record_to_text(&record),
            record: Some(record),
            source: RecordSource::Cache,
        }
    }

    /// Full research call for a cache miss.
    async fn full_research(&self, query: &str, history: &[ChatTurn]) -> ResearchOutcome {
        let mut messages: Vec<ChatTurn> = history
            .iter()
            .rev()
            .take(self.config.max_history)
            .rev()
            .cloned()
            .collect();
        messages.push(ChatTurn::user(query));

        let request = CompletionRequest {
            system_prompt: RESEARCH_PROMPT.to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let text = match self.provider.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "completion provider unavailable, using fallback");
                return ResearchOutcome {
                    record: None,
                    raw: FALLBACK_TEXT.to_string(),
                    source: RecordSource::Fallback,
                };
            }
        };

        match extract::extract(&text) {
            Ok(record) => {
                info!(strain = %record.name, "extracted new strain record");
                if let Err(e) = self.store.insert(&record).await {
                    warn!(error = %e, "cache insert failed");
                }
                ResearchOutcome {
                    record: Some(record),
                    raw: text,
                    source: RecordSource::Provider,
                }
            }
            Err(_) => {
                debug!("response unparseable, returning raw text");
                ResearchOutcome {
                    record: None,
                    raw: text,
                    source: RecordSource::Provider,
                }
            }
        }
    }
}
